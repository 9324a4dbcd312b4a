//! Picks the commit sink for this run.

use std::io::Write;

use anyhow::{Context, Result};
use async_trait::async_trait;
use editor_core::{CommitSink, FileSink, HttpSink, SinkError, SinkReceipt};
use shared::protocol::CurriculumSubmission;

use crate::config::Settings;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkChoice {
    Http(String),
    File(std::path::PathBuf),
    Stdout,
}

impl SinkChoice {
    /// Stdout then carries only the submission JSON, so anything meant for
    /// a person has to go to stderr.
    pub fn writes_to_stdout(&self) -> bool {
        matches!(self, SinkChoice::Stdout)
    }
}

pub fn choose_sink(settings: &Settings) -> SinkChoice {
    if let Some(url) = &settings.submit_url {
        SinkChoice::Http(url.clone())
    } else if let Some(path) = &settings.output_path {
        SinkChoice::File(path.clone())
    } else {
        SinkChoice::Stdout
    }
}

pub fn build_sink(choice: SinkChoice, settings: &Settings) -> Result<Box<dyn CommitSink>> {
    let sink: Box<dyn CommitSink> = match choice {
        SinkChoice::Http(url) => Box::new(
            HttpSink::new(url, settings.request_timeout()).context("failed to build http client")?,
        ),
        SinkChoice::File(path) => Box::new(FileSink::new(path)),
        SinkChoice::Stdout => Box::new(StdoutSink),
    };
    Ok(sink)
}

/// Prints the submission so it can be piped into the next step.
pub struct StdoutSink;

#[async_trait]
impl CommitSink for StdoutSink {
    async fn deliver(&self, submission: &CurriculumSubmission) -> Result<SinkReceipt, SinkError> {
        write_submission(&mut std::io::stdout().lock(), submission)?;
        Ok(SinkReceipt {
            submission_id: submission.submission_id,
            destination: "stdout".to_string(),
            message: None,
        })
    }
}

pub fn write_submission(
    out: &mut impl Write,
    submission: &CurriculumSubmission,
) -> Result<(), SinkError> {
    serde_json::to_writer_pretty(&mut *out, submission)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}
