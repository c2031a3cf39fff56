use crate::model::todo::{Bucket, ItemId, TodoCollection, TodoItem};

/// Error type for to-do list operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TodoError {
    #[error("task text is empty")]
    EmptyText,
    #[error("new tasks go to immediate or backlog, not done")]
    AddToDone,
    #[error("task not found: {0}")]
    NotFound(ItemId),
    #[error("no task {index} in {bucket}")]
    NoSuchPosition { bucket: Bucket, index: usize },
}

/// How an inline edit ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// New text stored
    Changed,
    /// Text was blank after trimming; the previous text stays
    Reverted,
}

/// Add a task to the end of `bucket`. Blank text is rejected and nothing
/// changes.
pub fn add_item(
    collection: &mut TodoCollection,
    text: &str,
    bucket: Bucket,
) -> Result<ItemId, TodoError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(TodoError::EmptyText);
    }
    if bucket == Bucket::Done {
        return Err(TodoError::AddToDone);
    }
    Ok(collection.push(bucket, text.to_string(), false))
}

/// Flip the checkbox. Checked tasks go to the end of done; unchecked tasks
/// always go to the end of immediate, whatever bucket they came from.
/// Returns the bucket the task ended up in.
pub fn toggle_done(collection: &mut TodoCollection, id: ItemId) -> Result<Bucket, TodoError> {
    let done = collection.get(id).ok_or(TodoError::NotFound(id))?.done;
    set_done(collection, id, !done)
}

/// Set the checkbox explicitly, with the same routing as [`toggle_done`]
pub fn set_done(
    collection: &mut TodoCollection,
    id: ItemId,
    done: bool,
) -> Result<Bucket, TodoError> {
    let (_, _, mut item) = collection.remove(id).ok_or(TodoError::NotFound(id))?;
    item.done = done;
    let target = if done { Bucket::Done } else { Bucket::Immediate };
    let end = collection.bucket(target).len();
    collection.insert(target, end, item);
    Ok(target)
}

/// Remove a task from whichever bucket holds it
pub fn delete_item(collection: &mut TodoCollection, id: ItemId) -> Result<TodoItem, TodoError> {
    collection
        .remove(id)
        .map(|(_, _, item)| item)
        .ok_or(TodoError::NotFound(id))
}

/// Move a task to `index` in `to`. The index counts positions after the
/// task has left its origin and is clamped to the bucket length. The
/// checkbox is left alone. Returns the index the task landed at.
pub fn move_item(
    collection: &mut TodoCollection,
    id: ItemId,
    to: Bucket,
    index: usize,
) -> Result<usize, TodoError> {
    let (_, _, item) = collection.remove(id).ok_or(TodoError::NotFound(id))?;
    Ok(collection.insert(to, index, item))
}

/// Store edited text. Trimmed input replaces the text; blank input leaves
/// `original` in place so a task never ends up empty.
pub fn commit_text(
    collection: &mut TodoCollection,
    id: ItemId,
    original: &str,
    edited: &str,
) -> Result<EditOutcome, TodoError> {
    let item = collection.get_mut(id).ok_or(TodoError::NotFound(id))?;
    let trimmed = edited.trim();
    if trimmed.is_empty() {
        item.text = original.to_string();
        Ok(EditOutcome::Reverted)
    } else {
        item.text = trimmed.to_string();
        Ok(EditOutcome::Changed)
    }
}

/// Id of the task at a zero-based position
pub fn id_at(collection: &TodoCollection, bucket: Bucket, index: usize) -> Result<ItemId, TodoError> {
    collection
        .at(bucket, index)
        .map(|item| item.id)
        .ok_or(TodoError::NoSuchPosition { bucket, index })
}
