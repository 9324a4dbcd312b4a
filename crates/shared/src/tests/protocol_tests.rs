use super::*;
use crate::domain::{ItemId, ItemKind};
use serde_json::json;

#[test]
fn extraction_envelope_decodes_upload_response() {
    let raw = json!({
        "success": true,
        "data": {
            "pdf_hash": "ab12",
            "curriculum": [
                {"title": "Chapter 1: Matter", "type": "chapter", "order": 1},
                {"title": "States of Matter", "type": "section", "order": 2}
            ]
        }
    });

    let envelope: ApiEnvelope<ExtractedCurriculum> =
        serde_json::from_value(raw).expect("envelope");
    let extracted = envelope.into_result().expect("success").expect("data");
    assert_eq!(extracted.pdf_hash.as_deref(), Some("ab12"));
    assert_eq!(extracted.curriculum.len(), 2);
    assert_eq!(extracted.curriculum[0].kind, ItemKind::Chapter);
    assert_eq!(extracted.curriculum[1].order, Some(2));
}

#[test]
fn failed_envelope_surfaces_server_message() {
    let raw = json!({"success": false, "message": "No PDF file provided"});
    let envelope: ApiEnvelope<ExtractedCurriculum> =
        serde_json::from_value(raw).expect("envelope");

    let err = envelope.into_result().expect_err("failure");
    assert_eq!(err.message, "No PDF file provided");
}

#[test]
fn extraction_requires_curriculum_key() {
    let err = serde_json::from_value::<ExtractedCurriculum>(json!({
        "pdf_hash": "ab12",
        "curriculm": [{"title": "A"}]
    }))
    .expect_err("misspelled key");
    assert!(err.to_string().contains("curriculum"));

    let empty: ExtractedCurriculum =
        serde_json::from_value(json!({"curriculum": []})).expect("empty list is fine");
    assert!(empty.curriculum.is_empty());
}

#[test]
fn submission_serializes_hash_and_items() {
    let submission = CurriculumSubmission::new(
        vec![CurriculumItem {
            id: ItemId(1),
            title: "A".into(),
            kind: ItemKind::Chapter,
            order: 1,
            extra: Default::default(),
        }],
        Some("deadbeef".into()),
    );

    let value = serde_json::to_value(&submission).expect("serialize");
    assert_eq!(value["pdf_hash"], "deadbeef");
    assert_eq!(value["curriculum"][0]["type"], "chapter");
    assert!(value["submission_id"].is_string());
    assert!(value["submitted_at"].is_string());
}

#[test]
fn submission_omits_missing_hash() {
    let submission = CurriculumSubmission::new(Vec::new(), None);
    let value = serde_json::to_value(&submission).expect("serialize");
    assert!(value.get("pdf_hash").is_none());
}
