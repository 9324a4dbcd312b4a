//! Destinations for a committed curriculum.

use std::{path::PathBuf, time::Duration};

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use shared::{
    error::ErrorCode,
    protocol::{ApiEnvelope, CurriculumSubmission},
};
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

use crate::error::SinkError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkReceipt {
    pub submission_id: Uuid,
    pub destination: String,
    pub message: Option<String>,
}

#[async_trait]
pub trait CommitSink: Send + Sync {
    async fn deliver(&self, submission: &CurriculumSubmission) -> Result<SinkReceipt, SinkError>;
}

/// Posts the submission as JSON to the lecture service.
pub struct HttpSink {
    http: Client,
    url: String,
}

impl HttpSink {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, SinkError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }
}

#[async_trait]
impl CommitSink for HttpSink {
    async fn deliver(&self, submission: &CurriculumSubmission) -> Result<SinkReceipt, SinkError> {
        let res = self.http.post(&self.url).json(submission).send().await?;
        let status = res.status();
        let body = res.text().await?;
        let envelope = serde_json::from_str::<ApiEnvelope<Value>>(&body).ok();
        debug!(url = %self.url, status = status.as_u16(), "lecture service responded");

        if !status.is_success() {
            let message = envelope
                .and_then(|envelope| envelope.message)
                .unwrap_or_else(|| fallback_message(&body, status.as_str()));
            return Err(SinkError::Rejected {
                code: ErrorCode::from_http_status(status.as_u16()),
                status: Some(status.as_u16()),
                message,
            });
        }

        let message = match envelope {
            Some(envelope) if !envelope.success => {
                return Err(SinkError::Rejected {
                    code: ErrorCode::Validation,
                    status: Some(status.as_u16()),
                    message: envelope
                        .message
                        .unwrap_or_else(|| "lecture service rejected the curriculum".to_string()),
                });
            }
            Some(envelope) => envelope.message,
            None => None,
        };

        Ok(SinkReceipt {
            submission_id: submission.submission_id,
            destination: self.url.clone(),
            message,
        })
    }
}

fn fallback_message(body: &str, status: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        format!("HTTP {status}")
    } else {
        body.to_string()
    }
}

/// Writes the submission as pretty JSON, creating parent directories.
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CommitSink for FileSink {
    async fn deliver(&self, submission: &CurriculumSubmission) -> Result<SinkReceipt, SinkError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let bytes = serde_json::to_vec_pretty(submission)?;
        tokio::fs::write(&self.path, bytes).await?;
        debug!(path = %self.path.display(), "wrote curriculum hand-off");

        Ok(SinkReceipt {
            submission_id: submission.submission_id,
            destination: self.path.display().to_string(),
            message: None,
        })
    }
}

/// In-process hand-off to whatever consumes the reviewed curriculum next.
#[derive(Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<CurriculumSubmission>,
}

impl ChannelSink {
    pub fn new(buffer: usize) -> (Self, mpsc::Receiver<CurriculumSubmission>) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        (Self { tx }, rx)
    }
}

#[async_trait]
impl CommitSink for ChannelSink {
    async fn deliver(&self, submission: &CurriculumSubmission) -> Result<SinkReceipt, SinkError> {
        self.tx
            .send(submission.clone())
            .await
            .map_err(|_| SinkError::Closed)?;

        Ok(SinkReceipt {
            submission_id: submission.submission_id,
            destination: "channel".to_string(),
            message: None,
        })
    }
}

#[cfg(test)]
#[path = "tests/sink_tests.rs"]
mod tests;
