use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(ItemId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Chapter,
    #[default]
    Section,
}

impl ItemKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemKind::Chapter => "chapter",
            ItemKind::Section => "section",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "chapter" => Some(ItemKind::Chapter),
            "section" => Some(ItemKind::Section),
            _ => None,
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One curriculum unit in the working sequence.
///
/// Keys the editor does not understand are kept in `extra` and written back
/// out untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurriculumItem {
    pub id: ItemId,
    pub title: String,
    #[serde(rename = "type", default)]
    pub kind: ItemKind,
    pub order: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Partial item record as delivered by the extraction step.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DraftItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ItemId>,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type", default)]
    pub kind: ItemKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DraftItem {
    pub fn new(title: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            title: title.into(),
            kind,
            ..Self::default()
        }
    }

    pub fn with_order(mut self, order: u32) -> Self {
        self.order = Some(order);
        self
    }
}

impl From<CurriculumItem> for DraftItem {
    fn from(value: CurriculumItem) -> Self {
        Self {
            id: Some(value.id),
            title: value.title,
            kind: value.kind,
            order: Some(value.order),
            extra: value.extra,
        }
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
