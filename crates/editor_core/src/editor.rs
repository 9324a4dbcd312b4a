//! The ordered item editor.
//!
//! Every structural operation (add, remove, move, dedupe) leaves `order`
//! equal to the item's 1-based position. Ids come from a monotonic
//! allocator: `load`/`reset` hand out `1..N` and removals never recycle or
//! rewrite an id, so an id stays a valid lookup key until the next reload.

use std::{
    collections::HashSet,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use serde_json::Value;
use shared::{
    domain::{CurriculumItem, DraftItem, ItemId, ItemKind},
    protocol::{CurriculumSubmission, ExtractedCurriculum},
};
use tracing::{debug, info, warn};

use crate::{
    error::{EditorError, SinkError},
    notice::Notice,
    sink::{CommitSink, SinkReceipt},
};

const CHAPTER_MARKER: &str = "📖";
const SECTION_MARKER: &str = "📝";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            _ => None,
        }
    }
}

/// A single-field update. Callers coerce numeric input before building one.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEdit {
    Title(String),
    Kind(ItemKind),
    Order(u32),
    Extra { name: String, value: Value },
}

impl FieldEdit {
    fn field_name(&self) -> &str {
        match self {
            FieldEdit::Title(_) => "title",
            FieldEdit::Kind(_) => "type",
            FieldEdit::Order(_) => "order",
            FieldEdit::Extra { name, .. } => name,
        }
    }

    /// Routes an `Extra` edit that names a typed field to that field, so the
    /// flattened map never shadows `id`, `title`, `type` or `order`. Returns
    /// `None` for `id` and for values the typed field cannot hold.
    fn into_typed(self) -> Option<FieldEdit> {
        let FieldEdit::Extra { name, value } = self else {
            return Some(self);
        };
        match name.as_str() {
            "id" => None,
            "title" => match value {
                Value::String(title) => Some(FieldEdit::Title(title)),
                _ => None,
            },
            "type" => value.as_str().and_then(ItemKind::parse).map(FieldEdit::Kind),
            "order" => value
                .as_u64()
                .and_then(|order| u32::try_from(order).ok())
                .map(FieldEdit::Order),
            _ => Some(FieldEdit::Extra { name, value }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Idle,
    Committing,
}

pub struct OrderedItemEditor {
    initial: Vec<DraftItem>,
    items: Vec<CurriculumItem>,
    next_id: i64,
    pdf_hash: Option<String>,
    committing: Arc<AtomicBool>,
    notice: Option<Notice>,
}

impl OrderedItemEditor {
    pub fn load(initial: Vec<DraftItem>) -> Self {
        let mut editor = Self {
            initial,
            items: Vec::new(),
            next_id: 1,
            pdf_hash: None,
            committing: Arc::new(AtomicBool::new(false)),
            notice: None,
        };
        editor.rebuild();
        info!(items = editor.items.len(), "loaded curriculum");
        editor
    }

    pub fn from_extraction(extracted: ExtractedCurriculum) -> Self {
        Self::load(extracted.curriculum).with_pdf_hash(extracted.pdf_hash)
    }

    pub fn with_pdf_hash(mut self, pdf_hash: Option<String>) -> Self {
        self.pdf_hash = pdf_hash;
        self
    }

    pub fn set_pdf_hash(&mut self, pdf_hash: Option<String>) {
        self.pdf_hash = pdf_hash;
    }

    pub fn pdf_hash(&self) -> Option<&str> {
        self.pdf_hash.as_deref()
    }

    pub fn items(&self) -> &[CurriculumItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: ItemId) -> Option<&CurriculumItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn mode(&self) -> EditorMode {
        if self.committing.load(Ordering::Acquire) {
            EditorMode::Committing
        } else {
            EditorMode::Idle
        }
    }

    pub fn is_committing(&self) -> bool {
        self.mode() == EditorMode::Committing
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    pub fn edit_field(&mut self, id: ItemId, edit: FieldEdit) -> &[CurriculumItem] {
        let Some(index) = self.position(id) else {
            debug!(item_id = id.0, "edit ignored, no such item");
            return &self.items;
        };

        let field = edit.field_name().to_string();
        let Some(edit) = edit.into_typed() else {
            debug!(
                item_id = id.0,
                field = field.as_str(),
                "edit ignored, field not writable with that value"
            );
            return &self.items;
        };

        let item = &mut self.items[index];
        debug!(item_id = id.0, field = field.as_str(), "editing field");
        match edit {
            FieldEdit::Title(title) => item.title = title,
            FieldEdit::Kind(kind) => item.kind = kind,
            FieldEdit::Order(order) => item.order = order,
            FieldEdit::Extra { name, value } => {
                item.extra.insert(name, value);
            }
        }
        &self.items
    }

    pub fn add_item(&mut self) -> &[CurriculumItem] {
        let order = position_order(self.items.len());
        let id = self.allocate_id();
        self.items.push(CurriculumItem {
            id,
            title: format!("New Unit {order}"),
            kind: ItemKind::Section,
            order,
            extra: Default::default(),
        });
        debug!(item_id = id.0, order, "added item");
        &self.items
    }

    pub fn remove_item(&mut self, id: ItemId) -> &[CurriculumItem] {
        let Some(index) = self.position(id) else {
            debug!(item_id = id.0, "remove ignored, no such item");
            return &self.items;
        };

        self.items.remove(index);
        self.renumber();
        debug!(item_id = id.0, len = self.items.len(), "removed item");
        &self.items
    }

    pub fn move_item(&mut self, id: ItemId, direction: Direction) -> &[CurriculumItem] {
        let Some(index) = self.position(id) else {
            debug!(item_id = id.0, "move ignored, no such item");
            return &self.items;
        };

        let target = match direction {
            Direction::Up => index.checked_sub(1),
            Direction::Down => Some(index + 1).filter(|target| *target < self.items.len()),
        };
        let Some(target) = target else {
            debug!(item_id = id.0, ?direction, "move ignored at boundary");
            return &self.items;
        };

        self.items.swap(index, target);
        self.renumber();
        debug!(item_id = id.0, from = index + 1, to = target + 1, "moved item");
        &self.items
    }

    /// Drops items whose normalized title repeats an earlier one, keeping the
    /// first occurrence. Returns how many were removed.
    pub fn dedupe_titles(&mut self) -> usize {
        let before = self.items.len();
        let mut seen = HashSet::new();
        self.items.retain(|item| {
            let keep = seen.insert(item.title.trim().to_lowercase());
            if !keep {
                debug!(item_id = item.id.0, title = %item.title, "skipping duplicate");
            }
            keep
        });
        self.renumber();

        let removed = before - self.items.len();
        if removed > 0 {
            info!(removed, "removed duplicate items");
        }
        removed
    }

    pub fn reset(&mut self) -> &[CurriculumItem] {
        self.rebuild();
        info!(items = self.items.len(), "reset curriculum to initial sequence");
        &self.items
    }

    pub fn summary(&self) -> String {
        if self.items.is_empty() {
            return "No curriculum available".to_string();
        }

        let mut out = format!("Curriculum: {} teaching units\n", self.items.len());
        out.push_str(&"=".repeat(60));
        out.push('\n');
        for item in &self.items {
            let marker = match item.kind {
                ItemKind::Chapter => CHAPTER_MARKER,
                ItemKind::Section => SECTION_MARKER,
            };
            out.push_str(&format!("{marker} {}. {}\n", item.order, item.title));
        }
        out
    }

    /// Snapshots the working sequence and enters the committing mode.
    ///
    /// The returned [`PendingCommit`] owns the busy flag; the editor goes
    /// back to idle when it is dropped, whatever the delivery outcome.
    pub fn begin_commit(&self) -> Result<PendingCommit, EditorError> {
        if self
            .committing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(EditorError::CommitInProgress);
        }

        let submission = CurriculumSubmission::new(self.items.clone(), self.pdf_hash.clone());
        debug!(
            submission_id = %submission.submission_id,
            items = submission.curriculum.len(),
            "commit started"
        );
        Ok(PendingCommit {
            submission,
            _guard: CommitGuard {
                flag: Arc::clone(&self.committing),
            },
        })
    }

    /// Records the user-visible notice for a finished delivery.
    pub fn record_outcome(&mut self, outcome: &Result<SinkReceipt, SinkError>) {
        let notice = match outcome {
            Ok(receipt) => {
                info!(
                    submission_id = %receipt.submission_id,
                    destination = %receipt.destination,
                    "curriculum committed"
                );
                Notice::committed(receipt)
            }
            Err(err) => {
                warn!(error = %err, "curriculum commit failed");
                Notice::from_sink_error(err)
            }
        };
        self.notice = Some(notice);
    }

    pub async fn commit(&mut self, sink: &dyn CommitSink) -> Result<SinkReceipt, EditorError> {
        let pending = self.begin_commit()?;
        let outcome = pending.deliver(sink).await;
        self.record_outcome(&outcome);
        Ok(outcome?)
    }

    fn rebuild(&mut self) {
        self.items = self
            .initial
            .iter()
            .enumerate()
            .map(|(index, draft)| CurriculumItem {
                id: ItemId(index as i64 + 1),
                title: draft.title.clone(),
                kind: draft.kind,
                order: draft.order.unwrap_or_else(|| position_order(index)),
                extra: draft.extra.clone(),
            })
            .collect();
        self.next_id = self.items.len() as i64 + 1;
    }

    fn allocate_id(&mut self) -> ItemId {
        let id = ItemId(self.next_id);
        self.next_id += 1;
        id
    }

    fn position(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    fn renumber(&mut self) {
        for (index, item) in self.items.iter_mut().enumerate() {
            item.order = position_order(index);
        }
    }
}

fn position_order(index: usize) -> u32 {
    u32::try_from(index + 1).unwrap_or(u32::MAX)
}

/// Clears the committing flag on drop.
pub struct CommitGuard {
    flag: Arc<AtomicBool>,
}

impl Drop for CommitGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// A commit that has been started but not yet delivered.
pub struct PendingCommit {
    submission: CurriculumSubmission,
    _guard: CommitGuard,
}

impl PendingCommit {
    pub fn submission(&self) -> &CurriculumSubmission {
        &self.submission
    }

    pub async fn deliver(self, sink: &dyn CommitSink) -> Result<SinkReceipt, SinkError> {
        sink.deliver(&self.submission).await
    }
}

#[cfg(test)]
#[path = "tests/editor_tests.rs"]
mod tests;
