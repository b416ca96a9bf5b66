use std::io::{self, BufRead};
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use board_core::{update, BoardConfig, BoardState, BoardViewModel, Msg};
use board_engine::{CycleOutcome, CyclePipeline, CycleReport, EngineEvent, FetchSettings, PollScheduler};
use board_logging::{board_debug, board_info, board_warn};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use crate::ui::terminal::TerminalPresenter;
use crate::ui::{apply_effects, Presenter};

const FRAME_INTERVAL: Duration = Duration::from_millis(50);
const OVERLAY_FILE: &str = "overlay.html";

/// Owns the board state and feeds every message through `update`.
pub struct BoardRunner<P: Presenter> {
    state: BoardState,
    presenter: P,
}

impl<P: Presenter> BoardRunner<P> {
    pub fn new(state: BoardState, presenter: P) -> Self {
        Self { state, presenter }
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn redraw(&mut self) {
        self.presenter.render(&self.state.view());
    }

    pub fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let board = state.view();
        let was_dirty = state.consume_dirty();
        self.state = state;

        apply_effects(&mut self.presenter, effects, &board);
        if was_dirty || self.presenter.needs_render() {
            self.presenter.render(&board);
        }
    }
}

pub fn report_to_msg(report: CycleReport, at: Instant) -> Msg {
    match report.outcome {
        CycleOutcome::Merged(merged) => Msg::CycleCompleted {
            seq: report.seq,
            merged,
            at,
        },
        CycleOutcome::Partial(merged) => Msg::CyclePartial {
            seq: report.seq,
            merged,
            at,
        },
        CycleOutcome::Abandoned(reason) => Msg::CycleAbandoned {
            seq: report.seq,
            reason,
        },
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Quit,
    Refresh,
    /// A rank or path from the drawn board, resolved to its page path.
    Click(String),
    Unknown(String),
}

/// Reads one command line: `q`, `r`, a rank shown on the board, or a page path.
pub fn parse_input(line: &str, board: &BoardViewModel) -> Option<Input> {
    let line = line.trim();
    match line {
        "" => None,
        "q" | "quit" => Some(Input::Quit),
        "r" | "refresh" => Some(Input::Refresh),
        _ => {
            let row = match line.parse::<usize>() {
                Ok(rank) if rank > 0 => board.rows.get(rank - 1),
                Ok(_) => None,
                Err(_) => board.rows.iter().find(|row| row.path == line),
            };
            match row {
                Some(row) => Some(Input::Click(row.path.clone())),
                None => Some(Input::Unknown(line.to_string())),
            }
        }
    }
}

fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Polls, animates, and draws until stdin says `q` or the process is interrupted.
pub async fn run(config: BoardConfig) -> anyhow::Result<()> {
    let pipeline = CyclePipeline::from_config(&config, FetchSettings::default())?;
    let (mut scheduler, mut events) =
        PollScheduler::new(Handle::current(), pipeline, config.poll_interval());

    let presenter = TerminalPresenter::new(io::stdout(), config.num_cols, PathBuf::from(OVERLAY_FILE));
    let mut runner = BoardRunner::new(BoardState::with_config(&config), presenter);
    runner.redraw();

    let mut input = spawn_stdin_reader();
    let mut frames = tokio::time::interval(FRAME_INTERVAL);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    scheduler.start();
    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                board_info!("interrupted");
                break;
            }
            Some(event) = events.recv() => match event {
                EngineEvent::CycleStarted { seq } => board_debug!("cycle {} started", seq),
                EngineEvent::CycleFinished(report) => {
                    board_debug!(
                        "cycle {} finished: {} ranked, {} batches",
                        report.seq,
                        report.ranked,
                        report.batches
                    );
                    runner.dispatch(report_to_msg(report, Instant::now()));
                }
            },
            _ = frames.tick() => {
                runner.dispatch(Msg::AnimationFrame { at: Instant::now() });
            }
            Some(line) = input.recv() => {
                match parse_input(&line, &runner.state().view()) {
                    Some(Input::Quit) => break,
                    Some(Input::Refresh) => {
                        let seq = scheduler.trigger();
                        board_info!("manual refresh as cycle {}", seq);
                    }
                    Some(Input::Click(path)) => runner.dispatch(Msg::EntityClicked { path }),
                    Some(Input::Unknown(text)) => {
                        board_warn!("unknown command {:?}; use a rank, a path, r, or q", text);
                    }
                    None => {}
                }
            }
        }
    }

    scheduler.shutdown();
    Ok(())
}
