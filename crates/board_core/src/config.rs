use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::join::{ContentFilter, DEFAULT_CONTENT_MARKER};
use crate::tween::{Easing, DEFAULT_ANIMATION};

pub const DEFAULT_HOST: &str = "ted.com";
pub const DEFAULT_NUM_COLS: usize = 5;
pub const DEFAULT_NUM_PAGES: usize = 30;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 10_000;
pub const DEFAULT_BATCH_SIZE: usize = 20;
pub const DEFAULT_CHAT_BASE_URL: &str = "http://localhost:8001";
pub const DEFAULT_ANIMATION_MS: u64 = DEFAULT_ANIMATION.as_millis() as u64;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: String, value: String },
    #[error("invalid ignore pattern {pattern:?}: {message}")]
    InvalidPattern { pattern: String, message: String },
}

/// Startup options. Field names match the override keys (camelCase).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BoardConfig {
    pub host: String,
    pub api_key: String,
    pub embedly_key: String,
    pub enable_chat: bool,
    pub num_cols: usize,
    pub num_pages: usize,
    pub poll_interval_ms: u64,
    pub batch_size: usize,
    pub content_marker: String,
    pub ignore_pattern: Option<String>,
    pub chat_base_url: String,
    /// Length of a count animation; zero shows new counts at once.
    pub animation_ms: u64,
    pub easing: Easing,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            api_key: String::new(),
            embedly_key: String::new(),
            enable_chat: false,
            num_cols: DEFAULT_NUM_COLS,
            num_pages: DEFAULT_NUM_PAGES,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            batch_size: DEFAULT_BATCH_SIZE,
            content_marker: DEFAULT_CONTENT_MARKER.to_string(),
            ignore_pattern: None,
            chat_base_url: DEFAULT_CHAT_BASE_URL.to_string(),
            animation_ms: DEFAULT_ANIMATION_MS,
            easing: Easing::Linear,
        }
    }
}

impl BoardConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn animation(&self) -> Duration {
        Duration::from_millis(self.animation_ms)
    }

    /// Base URL for chat iframes, or `None` when chat is disabled.
    pub fn chat_base(&self) -> Option<&str> {
        self.enable_chat.then_some(self.chat_base_url.as_str())
    }

    pub fn content_filter(&self) -> Result<ContentFilter, ConfigError> {
        let filter = ContentFilter::new(self.content_marker.clone());
        match self.ignore_pattern.as_deref().filter(|p| !p.is_empty()) {
            Some(pattern) => {
                filter
                    .with_ignore_pattern(pattern)
                    .map_err(|err| ConfigError::InvalidPattern {
                        pattern: pattern.to_string(),
                        message: err.to_string(),
                    })
            }
            None => Ok(filter),
        }
    }

    /// Applies one override. Returns `Ok(false)` for unknown keys and for
    /// empty values, which leave the current value in place.
    pub fn apply_override(&mut self, key: &str, value: &str) -> Result<bool, ConfigError> {
        let value = value.trim();
        if value.is_empty() {
            return Ok(false);
        }
        match key {
            "host" => self.host = value.to_string(),
            "apiKey" => self.api_key = value.to_string(),
            "embedlyKey" => self.embedly_key = value.to_string(),
            "enableChat" => self.enable_chat = parse_flag(key, value)?,
            "numCols" => self.num_cols = parse_positive(key, value)?,
            "numPages" => self.num_pages = parse_positive(key, value)?,
            "pollIntervalMs" => self.poll_interval_ms = parse_positive::<u64>(key, value)?,
            "batchSize" => self.batch_size = parse_positive(key, value)?,
            "contentMarker" => self.content_marker = value.to_string(),
            "ignorePattern" => self.ignore_pattern = Some(value.to_string()),
            "chatBaseUrl" => self.chat_base_url = value.to_string(),
            "animationMs" => {
                self.animation_ms = value.parse().map_err(|_| invalid(key, value))?;
            }
            "easing" => self.easing = Easing::parse(value).ok_or_else(|| invalid(key, value))?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    /// Applies `a=b&c=d` style overrides (a leading `?` is allowed).
    /// Rejected values are returned and leave the config unchanged for that key.
    pub fn apply_query(&mut self, query: &str) -> Vec<ConfigError> {
        let query = query.trim().trim_start_matches('?');
        url::form_urlencoded::parse(query.as_bytes())
            .filter_map(|(key, value)| self.apply_override(&key, &value).err())
            .collect()
    }

    /// Checks the combination of values is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(invalid("host", &self.host));
        }
        for (key, value) in [
            ("numCols", self.num_cols),
            ("numPages", self.num_pages),
            ("batchSize", self.batch_size),
        ] {
            if value == 0 {
                return Err(invalid(key, "0"));
            }
        }
        if self.poll_interval_ms == 0 {
            return Err(invalid("pollIntervalMs", "0"));
        }
        self.content_filter().map(|_| ())
    }
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(invalid(key, value)),
    }
}

fn parse_positive<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialEq + Default,
{
    match value.parse::<T>() {
        Ok(parsed) if parsed != T::default() => Ok(parsed),
        _ => Err(invalid(key, value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_values() {
        let config = BoardConfig::default();
        assert_eq!(config.host, "ted.com");
        assert_eq!(config.num_cols, 5);
        assert_eq!(config.num_pages, 30);
        assert!(!config.enable_chat);
        assert_eq!(config.poll_interval(), Duration::from_secs(10));
        assert_eq!(config.chat_base(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn query_overrides_known_keys() {
        let mut config = BoardConfig::default();
        let rejected = config.apply_query("?host=example.org&numPages=12&enableChat=true&unknown=1");
        assert!(rejected.is_empty());
        assert_eq!(config.host, "example.org");
        assert_eq!(config.num_pages, 12);
        assert_eq!(config.chat_base(), Some(DEFAULT_CHAT_BASE_URL));
    }

    #[test]
    fn animation_overrides() {
        let mut config = BoardConfig::default();
        assert_eq!(config.animation(), Duration::from_secs(1));

        let rejected = config.apply_query("animationMs=250&easing=easeInOut");
        assert!(rejected.is_empty());
        assert_eq!(config.animation(), Duration::from_millis(250));
        assert_eq!(config.easing, Easing::EaseInOut);

        let rejected = config.apply_query("animationMs=-1&easing=bounce");
        assert_eq!(rejected.len(), 2);
        assert_eq!(config.animation_ms, 250);
        assert_eq!(config.easing, Easing::EaseInOut);
    }

    #[test]
    fn bad_values_are_reported_and_ignored() {
        let mut config = BoardConfig::default();
        let rejected = config.apply_query("numCols=zero&batchSize=0&apiKey=");
        assert_eq!(rejected.len(), 2);
        assert_eq!(config.num_cols, DEFAULT_NUM_COLS);
        assert_eq!(config.batch_size, DEFAULT_BATCH_SIZE);
        assert_eq!(config.api_key, "");
    }

    #[test]
    fn invalid_ignore_pattern_fails_validation() {
        let config = BoardConfig {
            ignore_pattern: Some("(".to_string()),
            ..BoardConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPattern { .. })
        ));
    }
}
