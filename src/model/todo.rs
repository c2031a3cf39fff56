use std::fmt;

use serde::{Deserialize, Serialize};

/// Runtime identity of a to-do item.
///
/// Ids are handed out by the owning [`TodoCollection`] and are never
/// persisted: the file format only stores text per bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One of the three to-do sequences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Immediate,
    Backlog,
    Done,
}

impl Bucket {
    /// Display and file order
    pub const ALL: [Bucket; 3] = [Bucket::Immediate, Bucket::Backlog, Bucket::Done];

    pub fn key(self) -> &'static str {
        match self {
            Bucket::Immediate => "immediate",
            Bucket::Backlog => "backlog",
            Bucket::Done => "done",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Bucket::Immediate => "Immediate",
            Bucket::Backlog => "Backlog",
            Bucket::Done => "Done",
        }
    }

    pub fn parse_bucket(s: &str) -> Option<Bucket> {
        match s.to_ascii_lowercase().as_str() {
            "immediate" | "i" | "now" => Some(Bucket::Immediate),
            "backlog" | "b" | "later" => Some(Bucket::Backlog),
            "done" | "d" => Some(Bucket::Done),
            _ => None,
        }
    }

    fn slot(self) -> usize {
        match self {
            Bucket::Immediate => 0,
            Bucket::Backlog => 1,
            Bucket::Done => 2,
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A single task line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoItem {
    pub id: ItemId,
    /// Task text, may span several lines
    pub text: String,
    /// Checkbox state. Only toggling changes it; moving between buckets does not.
    pub done: bool,
}

/// The three ordered buckets of to-do items.
///
/// Every item lives in exactly one bucket. Moves are remove-then-insert.
#[derive(Debug, Clone, Default)]
pub struct TodoCollection {
    buckets: [Vec<TodoItem>; 3],
    next_id: u64,
}

impl TodoCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection from plain text lists, the shape of the on-disk file.
    /// Items in `done` start checked, all others unchecked.
    pub fn from_lists(immediate: Vec<String>, backlog: Vec<String>, done: Vec<String>) -> Self {
        let mut collection = TodoCollection::new();
        for text in immediate {
            collection.push(Bucket::Immediate, text, false);
        }
        for text in backlog {
            collection.push(Bucket::Backlog, text, false);
        }
        for text in done {
            collection.push(Bucket::Done, text, true);
        }
        collection
    }

    pub fn bucket(&self, bucket: Bucket) -> &[TodoItem] {
        &self.buckets[bucket.slot()]
    }

    pub fn bucket_mut(&mut self, bucket: Bucket) -> &mut Vec<TodoItem> {
        &mut self.buckets[bucket.slot()]
    }

    /// Text of every item in a bucket, in order
    pub fn texts(&self, bucket: Bucket) -> Vec<String> {
        self.bucket(bucket).iter().map(|i| i.text.clone()).collect()
    }

    /// Append a new item, returning its fresh id
    pub fn push(&mut self, bucket: Bucket, text: String, done: bool) -> ItemId {
        let id = self.allocate_id();
        self.bucket_mut(bucket).push(TodoItem { id, text, done });
        id
    }

    fn allocate_id(&mut self) -> ItemId {
        self.next_id += 1;
        ItemId(self.next_id)
    }

    /// Bucket and index currently holding `id`
    pub fn locate(&self, id: ItemId) -> Option<(Bucket, usize)> {
        Bucket::ALL.into_iter().find_map(|bucket| {
            self.bucket(bucket)
                .iter()
                .position(|item| item.id == id)
                .map(|idx| (bucket, idx))
        })
    }

    pub fn get(&self, id: ItemId) -> Option<&TodoItem> {
        let (bucket, idx) = self.locate(id)?;
        self.bucket(bucket).get(idx)
    }

    pub fn get_mut(&mut self, id: ItemId) -> Option<&mut TodoItem> {
        let (bucket, idx) = self.locate(id)?;
        self.bucket_mut(bucket).get_mut(idx)
    }

    /// Item at a position, if any
    pub fn at(&self, bucket: Bucket, idx: usize) -> Option<&TodoItem> {
        self.bucket(bucket).get(idx)
    }

    /// Remove an item from whichever bucket holds it
    pub fn remove(&mut self, id: ItemId) -> Option<(Bucket, usize, TodoItem)> {
        let (bucket, idx) = self.locate(id)?;
        let item = self.bucket_mut(bucket).remove(idx);
        Some((bucket, idx, item))
    }

    /// Insert an item, clamping `idx` to the bucket length. Returns the
    /// index the item landed at.
    pub fn insert(&mut self, bucket: Bucket, idx: usize, item: TodoItem) -> usize {
        let list = self.bucket_mut(bucket);
        let idx = idx.min(list.len());
        list.insert(idx, item);
        idx
    }

    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(Vec::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn from_lists_marks_only_done_items_checked() {
        let c = TodoCollection::from_lists(strings(&["a"]), strings(&["b"]), strings(&["c"]));
        assert!(!c.bucket(Bucket::Immediate)[0].done);
        assert!(!c.bucket(Bucket::Backlog)[0].done);
        assert!(c.bucket(Bucket::Done)[0].done);
        assert_eq!(c.len(), 3);
    }

    #[test]
    fn ids_are_unique_across_buckets() {
        let c = TodoCollection::from_lists(
            strings(&["a", "a"]),
            strings(&["a"]),
            strings(&["a"]),
        );
        let mut ids: Vec<ItemId> = Bucket::ALL
            .iter()
            .flat_map(|b| c.bucket(*b).iter().map(|i| i.id))
            .collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn remove_then_insert_moves_item() {
        let mut c = TodoCollection::from_lists(strings(&["a", "b"]), vec![], vec![]);
        let id = c.bucket(Bucket::Immediate)[0].id;
        let (from, idx, item) = c.remove(id).unwrap();
        assert_eq!((from, idx), (Bucket::Immediate, 0));
        let landed = c.insert(Bucket::Backlog, 99, item);
        assert_eq!(landed, 0);
        assert_eq!(c.locate(id), Some((Bucket::Backlog, 0)));
        assert_eq!(c.texts(Bucket::Immediate), vec!["b"]);
    }

    #[test]
    fn locate_missing_id() {
        let mut c = TodoCollection::new();
        let id = c.push(Bucket::Backlog, "x".into(), false);
        c.remove(id);
        assert!(c.locate(id).is_none());
        assert!(c.is_empty());
    }

    #[test]
    fn parse_bucket_names() {
        assert_eq!(Bucket::parse_bucket("Immediate"), Some(Bucket::Immediate));
        assert_eq!(Bucket::parse_bucket("b"), Some(Bucket::Backlog));
        assert_eq!(Bucket::parse_bucket("done"), Some(Bucket::Done));
        assert_eq!(Bucket::parse_bucket("later-ish"), None);
    }
}
