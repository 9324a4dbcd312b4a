//! User-visible notices raised by commit outcomes.

use shared::error::ErrorCode;

use crate::{
    error::{SinkError, TransportKind},
    sink::SinkReceipt,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeCategory {
    Committed,
    Transport,
    Rejected,
    Storage,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    level: NoticeLevel,
    category: NoticeCategory,
    message: String,
}

impl Notice {
    pub fn committed(receipt: &SinkReceipt) -> Self {
        let message = match &receipt.message {
            Some(server_message) => {
                format!("Curriculum sent to {}: {server_message}", receipt.destination)
            }
            None => format!("Curriculum sent to {}", receipt.destination),
        };
        Self {
            level: NoticeLevel::Info,
            category: NoticeCategory::Committed,
            message,
        }
    }

    pub fn from_sink_error(err: &SinkError) -> Self {
        let category = match err {
            SinkError::Rejected {
                code: ErrorCode::Unavailable,
                ..
            } => NoticeCategory::Transport,
            SinkError::Rejected { .. } => NoticeCategory::Rejected,
            SinkError::Io(_) => NoticeCategory::Storage,
            SinkError::Transport {
                kind: TransportKind::Connect | TransportKind::Timeout,
                ..
            } => NoticeCategory::Transport,
            SinkError::Transport { message, .. } => classify_message(message),
            SinkError::Closed => NoticeCategory::Transport,
            SinkError::Serialization(_) => NoticeCategory::Unknown,
        };

        let message = match category {
            NoticeCategory::Transport => format!(
                "Lecture service unreachable; your edits are kept, retry when the connection is back ({err})"
            ),
            NoticeCategory::Rejected => format!("Curriculum was not accepted: {err}"),
            NoticeCategory::Storage => format!("Could not save the curriculum hand-off: {err}"),
            _ => format!("Failed to start the lecture: {err}"),
        };

        Self {
            level: NoticeLevel::Error,
            category,
            message,
        }
    }

    pub fn level(&self) -> NoticeLevel {
        self.level
    }

    pub fn category(&self) -> NoticeCategory {
        self.category
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

fn classify_message(message: &str) -> NoticeCategory {
    let lower = message.to_ascii_lowercase();
    if lower.contains("timed out")
        || lower.contains("timeout")
        || lower.contains("connect")
        || lower.contains("connection")
        || lower.contains("dns")
        || lower.contains("network")
    {
        NoticeCategory::Transport
    } else {
        NoticeCategory::Unknown
    }
}

#[cfg(test)]
#[path = "tests/notice_tests.rs"]
mod tests;
