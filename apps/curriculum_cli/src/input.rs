//! Reading the extracted curriculum and edit scripts from disk.

use std::{fs, path::Path};

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use shared::{
    domain::DraftItem,
    protocol::{ApiEnvelope, ExtractedCurriculum},
};

/// Accepted shapes: the raw upload response, its `data` payload, or a bare
/// item array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InputDocument {
    Envelope(ApiEnvelope<ExtractedCurriculum>),
    Extracted(ExtractedCurriculum),
    Items(Vec<DraftItem>),
}

pub fn parse_extraction(raw: &str) -> Result<ExtractedCurriculum> {
    let document: InputDocument =
        serde_json::from_str(raw).context("curriculum input is not a recognised JSON shape")?;

    match document {
        InputDocument::Envelope(envelope) => envelope
            .into_result()
            .map_err(|err| anyhow!("extraction reported failure: {}", err.message))?
            .ok_or_else(|| anyhow!("extraction response has no data")),
        InputDocument::Extracted(extracted) => Ok(extracted),
        InputDocument::Items(curriculum) => Ok(ExtractedCurriculum {
            pdf_hash: None,
            curriculum,
        }),
    }
}

pub fn load_extraction(path: &Path) -> Result<ExtractedCurriculum> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read curriculum input '{}'", path.display()))?;
    parse_extraction(&raw).with_context(|| format!("invalid curriculum input '{}'", path.display()))
}

/// One command per line; blank lines and `#` comments are skipped.
pub fn script_lines(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

pub fn load_script(path: &Path) -> Result<Vec<String>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read edit script '{}'", path.display()))?;
    Ok(script_lines(&raw))
}

#[cfg(test)]
#[path = "tests/input_tests.rs"]
mod tests;
