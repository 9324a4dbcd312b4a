use super::*;
use serde_json::json;

#[test]
fn item_kind_serializes_under_type_key() {
    let item = CurriculumItem {
        id: ItemId(1),
        title: "Cells".into(),
        kind: ItemKind::Chapter,
        order: 1,
        extra: Map::new(),
    };

    let value = serde_json::to_value(&item).expect("serialize");
    assert_eq!(
        value,
        json!({"id": 1, "title": "Cells", "type": "chapter", "order": 1})
    );
}

#[test]
fn unknown_keys_pass_through_round_trip() {
    let raw = json!({
        "id": 4,
        "title": "Tissues",
        "type": "section",
        "order": 2,
        "page": 17,
        "source": {"kind": "toc"}
    });

    let item: CurriculumItem = serde_json::from_value(raw.clone()).expect("deserialize");
    assert_eq!(item.extra.get("page"), Some(&json!(17)));
    assert_eq!(serde_json::to_value(&item).expect("serialize"), raw);
}

#[test]
fn draft_item_defaults_missing_fields() {
    let draft: DraftItem = serde_json::from_value(json!({"title": "Intro"})).expect("draft");
    assert_eq!(draft.kind, ItemKind::Section);
    assert_eq!(draft.order, None);
    assert_eq!(draft.id, None);
    assert!(draft.extra.is_empty());
}

#[test]
fn item_kind_parse_is_case_insensitive() {
    assert_eq!(ItemKind::parse(" Chapter "), Some(ItemKind::Chapter));
    assert_eq!(ItemKind::parse("SECTION"), Some(ItemKind::Section));
    assert_eq!(ItemKind::parse("unit"), None);
}
