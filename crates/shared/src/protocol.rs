use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    domain::{CurriculumItem, DraftItem},
    error::{ApiException, ErrorCode},
};

/// `{success, data, message}` wrapper used by every lecture-service response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Unwraps the payload, turning `success: false` into an [`ApiException`].
    pub fn into_result(self) -> Result<Option<T>, ApiException> {
        if self.success {
            return Ok(self.data);
        }
        Err(ApiException::new(
            ErrorCode::Internal,
            self.message
                .unwrap_or_else(|| "request failed without a message".to_string()),
        ))
    }
}

/// Payload of the PDF upload/extraction response. `curriculum` is required
/// so a misspelled key is an error instead of an empty curriculum.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedCurriculum {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_hash: Option<String>,
    pub curriculum: Vec<DraftItem>,
}

/// What a commit hands to its sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurriculumSubmission {
    pub submission_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_hash: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub curriculum: Vec<CurriculumItem>,
}

impl CurriculumSubmission {
    pub fn new(curriculum: Vec<CurriculumItem>, pdf_hash: Option<String>) -> Self {
        Self {
            submission_id: Uuid::new_v4(),
            pdf_hash,
            submitted_at: Utc::now(),
            curriculum,
        }
    }
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
