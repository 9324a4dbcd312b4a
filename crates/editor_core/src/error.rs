use std::error::Error as _;

use shared::error::ErrorCode;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    Connect,
    Timeout,
    Other,
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("transport failure: {message}")]
    Transport { kind: TransportKind, message: String },
    #[error("submission rejected ({code:?}): {message}")]
    Rejected {
        code: ErrorCode,
        status: Option<u16>,
        message: String,
    },
    #[error("failed to write hand-off file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode submission: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("receiver for committed curriculum is closed")]
    Closed,
}

impl SinkError {
    pub fn transport(kind: TransportKind, message: impl Into<String>) -> Self {
        SinkError::Transport {
            kind,
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for SinkError {
    fn from(value: reqwest::Error) -> Self {
        let kind = if value.is_timeout() {
            TransportKind::Timeout
        } else if value.is_connect() {
            TransportKind::Connect
        } else {
            TransportKind::Other
        };

        // reqwest's Display stops at the outer layer; keep the causes.
        let mut message = value.to_string();
        let mut source = value.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        SinkError::Transport { kind, message }
    }
}

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("a commit is already in progress")]
    CommitInProgress,
    #[error("commit failed: {0}")]
    Sink(#[from] SinkError),
}
