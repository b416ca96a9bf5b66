mod runner;
mod settings;
mod ui;

use std::path::PathBuf;

use anyhow::Context;
use board_logging::{board_info, LogDestination, DEFAULT_LOG_FILE};
use log::LevelFilter;

/// `terminal`, `both`, or anything else for the log file only.
const LOG_TO_ENV: &str = "BOARD_LOG_TO";

fn log_destination_from_env() -> LogDestination {
    match std::env::var(LOG_TO_ENV).as_deref().map(str::trim) {
        Ok("terminal") => LogDestination::Terminal,
        Ok("both") => LogDestination::Both(PathBuf::from(DEFAULT_LOG_FILE)),
        _ => LogDestination::default(),
    }
}

fn main() -> anyhow::Result<()> {
    board_logging::initialize(
        log_destination_from_env(),
        board_logging::level_from_env(LevelFilter::Info),
    );

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = settings::load_config(settings::config_path_from_env().as_deref(), &args)?;
    board_info!(
        "Starting board for {} ({} pages, every {:?})",
        config.host,
        config.num_pages,
        config.poll_interval()
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("building async runtime")?;
    runtime.block_on(runner::run(config))
}
