use std::fmt;

use board_core::{ConfigError, CycleSeq, MergedPageRecord};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutput {
    pub bytes: Vec<u8>,
    pub metadata: FetchMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchMetadata {
    pub url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub byte_len: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    UnsupportedContentType { content_type: String },
    EmptyResponse,
    MalformedPayload,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::UnsupportedContentType { content_type } => {
                write!(f, "unsupported content type {content_type}")
            }
            FailureKind::EmptyResponse => write!(f, "empty response"),
            FailureKind::MalformedPayload => write!(f, "malformed payload"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

/// Errors raised while wiring the engine together.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("http client: {0}")]
    Client(#[from] FetchError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Every enrichment batch was answered.
    Merged(Vec<MergedPageRecord>),
    /// Enrichment stopped early; the set covers only the leading part of the
    /// ranking and must not release entities it did not reach.
    Partial(Vec<MergedPageRecord>),
    /// The cycle gave up; the board should stay as it is.
    Abandoned(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub seq: CycleSeq,
    pub ranked: usize,
    pub batches: usize,
    pub outcome: CycleOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    CycleStarted { seq: CycleSeq },
    CycleFinished(CycleReport),
}
