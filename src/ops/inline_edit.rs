//! Per-item Viewing/Editing state machine.
//!
//! An item enters Editing with its current text in an editable buffer.
//! Committing trims and stores the text (blank input reverts), cancelling
//! restores the text verbatim. Only a commit asks for a save.

use crate::model::todo::{ItemId, TodoCollection};
use crate::ops::todo_ops::{self, EditOutcome, TodoError};
use crate::util::{TextBuffer, unicode};

/// Rows the edit field occupies even for one-line text
pub const MIN_EDIT_ROWS: usize = 3;

/// An item being edited in place
#[derive(Debug, Clone)]
pub struct InlineEdit {
    pub id: ItemId,
    /// Text when editing began, restored on cancel
    pub original: String,
    pub buffer: TextBuffer,
}

/// What the view should do once an edit ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditEnd {
    /// Committed (changed or reverted); the collection must be saved
    Committed(EditOutcome),
    /// Cancelled; nothing to save
    Cancelled,
}

impl EditEnd {
    pub fn needs_save(self) -> bool {
        matches!(self, EditEnd::Committed(_))
    }
}

impl InlineEdit {
    /// Viewing -> Editing, pre-filled with the item's current text
    pub fn begin(collection: &TodoCollection, id: ItemId) -> Result<Self, TodoError> {
        let item = collection.get(id).ok_or(TodoError::NotFound(id))?;
        Ok(InlineEdit {
            id,
            original: item.text.clone(),
            buffer: TextBuffer::from_text(item.text.clone()),
        })
    }

    /// Editing -> Viewing, keeping the edited text (blur, Enter)
    pub fn commit(self, collection: &mut TodoCollection) -> Result<EditEnd, TodoError> {
        let outcome = todo_ops::commit_text(collection, self.id, &self.original, self.buffer.text())?;
        Ok(EditEnd::Committed(outcome))
    }

    /// Editing -> Viewing, dropping the edits (Escape)
    pub fn cancel(self, collection: &mut TodoCollection) -> EditEnd {
        if let Some(item) = collection.get_mut(self.id) {
            item.text = self.original;
        }
        EditEnd::Cancelled
    }

    /// Height of the edit field: grows with the content
    pub fn rows(&self, width: usize) -> usize {
        let wrapped: usize = self
            .buffer
            .lines()
            .map(|line| unicode::wrap_ranges(line, width).len())
            .sum();
        wrapped.max(MIN_EDIT_ROWS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::todo::Bucket;

    fn one_item(text: &str) -> (TodoCollection, ItemId) {
        let mut c = TodoCollection::new();
        let id = c.push(Bucket::Immediate, text.to_string(), false);
        (c, id)
    }

    #[test]
    fn begin_prefills_current_text() {
        let (c, id) = one_item("buy milk");
        let edit = InlineEdit::begin(&c, id).unwrap();
        assert_eq!(edit.buffer.text(), "buy milk");
        assert_eq!(edit.buffer.cursor(), "buy milk".len());
    }

    #[test]
    fn commit_stores_trimmed_text_and_saves() {
        let (mut c, id) = one_item("buy milk");
        let mut edit = InlineEdit::begin(&c, id).unwrap();
        edit.buffer.insert_str(" and eggs  ");
        let end = edit.commit(&mut c).unwrap();
        assert_eq!(end, EditEnd::Committed(EditOutcome::Changed));
        assert!(end.needs_save());
        assert_eq!(c.get(id).unwrap().text, "buy milk and eggs");
    }

    #[test]
    fn committing_empty_reverts_but_still_saves() {
        let (mut c, id) = one_item("buy milk");
        let mut edit = InlineEdit::begin(&c, id).unwrap();
        edit.buffer.clear();
        let end = edit.commit(&mut c).unwrap();
        assert_eq!(end, EditEnd::Committed(EditOutcome::Reverted));
        assert!(end.needs_save());
        assert_eq!(c.get(id).unwrap().text, "buy milk");
    }

    #[test]
    fn cancel_restores_exact_text_without_save() {
        let original = "  first line\n\nthird line ";
        let (mut c, id) = one_item(original);
        let mut edit = InlineEdit::begin(&c, id).unwrap();
        edit.buffer.set_text("something else");
        let end = edit.cancel(&mut c);
        assert_eq!(end, EditEnd::Cancelled);
        assert!(!end.needs_save());
        assert_eq!(c.get(id).unwrap().text, original);
    }

    #[test]
    fn commit_after_item_vanished() {
        let (mut c, id) = one_item("x");
        let edit = InlineEdit::begin(&c, id).unwrap();
        c.remove(id);
        assert_eq!(edit.commit(&mut c), Err(TodoError::NotFound(id)));
    }

    #[test]
    fn field_grows_with_content() {
        let (c, id) = one_item("short");
        let mut edit = InlineEdit::begin(&c, id).unwrap();
        assert_eq!(edit.rows(20), MIN_EDIT_ROWS);
        edit.buffer.set_text("1\n2\n3\n4");
        assert_eq!(edit.rows(20), 4);
        edit.buffer.set_text("a".repeat(50));
        assert_eq!(edit.rows(10), 5);
    }
}
