//! Startup configuration: an optional RON file, then query-style overrides.

use std::fs;
use std::path::{Path, PathBuf};

use board_core::{BoardConfig, ConfigError};
use board_logging::{board_info, board_warn};
use thiserror::Error;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "BOARD_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "board.ron";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot parse config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error(transparent)]
    Invalid(#[from] ConfigError),
}

pub fn config_path_from_env() -> Option<PathBuf> {
    std::env::var_os(CONFIG_ENV)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// Loads the config file (an explicit path must exist; the default
/// `board.ron` may be absent), then applies each argument as a
/// `key=value` or `?a=b&c=d` override.
pub fn load_config(
    explicit: Option<&Path>,
    overrides: &[String],
) -> Result<BoardConfig, SettingsError> {
    let mut config = match explicit {
        Some(path) => read_config(path)?,
        None => {
            let path = Path::new(DEFAULT_CONFIG_FILE);
            if path.exists() {
                read_config(path)?
            } else {
                BoardConfig::default()
            }
        }
    };

    for arg in overrides {
        for rejected in config.apply_query(arg) {
            board_warn!("ignoring override: {}", rejected);
        }
    }

    config.validate()?;
    Ok(config)
}

fn read_config(path: &Path) -> Result<BoardConfig, SettingsError> {
    let content = fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = ron::from_str(&content).map_err(|err| SettingsError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    board_info!("Loaded config from {:?}", path);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn file_values_are_overridden_by_arguments() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("board.ron");
        fs::write(
            &path,
            r#"(host: "example.org", apiKey: "k1", numPages: 12, enableChat: true)"#,
        )
        .unwrap();

        let config = load_config(
            Some(&path),
            &["numPages=40".to_string(), "?apiKey=k2&numCols=3".to_string()],
        )
        .unwrap();

        assert_eq!(config.host, "example.org");
        assert_eq!(config.api_key, "k2");
        assert_eq!(config.num_pages, 40);
        assert_eq!(config.num_cols, 3);
        assert!(config.enable_chat);
        assert_eq!(config.batch_size, board_core::DEFAULT_BATCH_SIZE);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let err = load_config(Some(&temp.path().join("nope.ron")), &[]).unwrap_err();
        assert!(matches!(err, SettingsError::Read { .. }));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("board.ron");
        fs::write(&path, "(host: ").unwrap();
        let err = load_config(Some(&path), &[]).unwrap_err();
        assert!(matches!(err, SettingsError::Parse { .. }));
    }

    #[test]
    fn invalid_combination_fails_validation() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("board.ron");
        fs::write(&path, r#"(ignorePattern: Some("["))"#).unwrap();
        let err = load_config(Some(&path), &[]).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Invalid(ConfigError::InvalidPattern { .. })
        ));
    }
}
