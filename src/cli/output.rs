use serde::Serialize;

use crate::io::paths::AppPaths;
use crate::io::recovery::RecoveryEntry;
use crate::model::todo::{Bucket, TodoCollection, TodoItem};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct ItemJson {
    /// 1-based, as accepted by the item commands
    pub index: usize,
    pub text: String,
    pub done: bool,
}

#[derive(Serialize)]
pub struct BucketJson {
    pub bucket: Bucket,
    pub items: Vec<ItemJson>,
}

#[derive(Serialize)]
pub struct PathsJson {
    pub data_dir: String,
    pub todo_file: String,
    pub autosave_file: String,
    pub config_file: String,
    pub recovery_log: String,
    pub log_file: String,
}

#[derive(Serialize)]
pub struct MemoJson {
    pub content: Option<String>,
}

pub fn bucket_to_json(collection: &TodoCollection, bucket: Bucket) -> BucketJson {
    BucketJson {
        bucket,
        items: collection
            .bucket(bucket)
            .iter()
            .enumerate()
            .map(|(i, item)| ItemJson {
                index: i + 1,
                text: item.text.clone(),
                done: item.done,
            })
            .collect(),
    }
}

pub fn paths_to_json(paths: &AppPaths) -> PathsJson {
    PathsJson {
        data_dir: paths.data_dir().display().to_string(),
        todo_file: paths.todo_file().display().to_string(),
        autosave_file: paths.autosave_file().display().to_string(),
        config_file: paths.config_file().display().to_string(),
        recovery_log: paths.recovery_log().display().to_string(),
        log_file: paths.log_file().display().to_string(),
    }
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// One bucket as a numbered list; continuation lines are indented under the
/// text.
pub fn format_bucket(collection: &TodoCollection, bucket: Bucket) -> String {
    let items = collection.bucket(bucket);
    let mut out = format!("{} ({})\n", bucket.label(), items.len());
    if items.is_empty() {
        out.push_str("  (empty)\n");
    }
    let number_width = items.len().to_string().len();
    for (i, item) in items.iter().enumerate() {
        out.push_str(&format_item(i + 1, number_width, item));
    }
    out
}

fn format_item(number: usize, number_width: usize, item: &TodoItem) -> String {
    let checkbox = if item.done { "[x]" } else { "[ ]" };
    let prefix = format!("  {:>w$}. {} ", number, checkbox, w = number_width);
    let indent = " ".repeat(prefix.len());
    let mut out = String::new();
    for (i, line) in item.text.split('\n').enumerate() {
        if i == 0 {
            out.push_str(&prefix);
        } else {
            out.push_str(&indent);
        }
        out.push_str(line);
        out.push('\n');
    }
    out
}

pub fn format_paths(paths: &AppPaths) -> String {
    let rows = [
        ("data dir", paths.data_dir().to_path_buf()),
        ("to-do", paths.todo_file()),
        ("autosave", paths.autosave_file()),
        ("config", paths.config_file()),
        ("recovery", paths.recovery_log()),
        ("log", paths.log_file()),
    ];
    rows.iter()
        .map(|(name, path)| format!("{:<9} {}\n", name, path.display()))
        .collect()
}

pub fn format_recovery(entries: &[RecoveryEntry]) -> String {
    if entries.is_empty() {
        return "recovery log is empty\n".to_string();
    }
    entries
        .iter()
        .map(|e| e.to_markdown())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collection() -> TodoCollection {
        TodoCollection::from_lists(
            vec!["call mom".into(), "groceries\nmilk".into()],
            vec![],
            vec!["filed taxes".into()],
        )
    }

    #[test]
    fn bucket_listing() {
        let c = collection();
        assert_eq!(
            format_bucket(&c, Bucket::Immediate),
            "Immediate (2)\n  1. [ ] call mom\n  2. [ ] groceries\n         milk\n"
        );
        assert_eq!(format_bucket(&c, Bucket::Backlog), "Backlog (0)\n  (empty)\n");
        assert_eq!(
            format_bucket(&c, Bucket::Done),
            "Done (1)\n  1. [x] filed taxes\n"
        );
    }

    #[test]
    fn bucket_json_numbers_from_one() {
        let json = serde_json::to_value(bucket_to_json(&collection(), Bucket::Immediate)).unwrap();
        assert_eq!(json["bucket"], "immediate");
        assert_eq!(json["items"][1]["index"], 2);
        assert_eq!(json["items"][1]["text"], "groceries\nmilk");
        assert_eq!(json["items"][0]["done"], false);
    }

    #[test]
    fn empty_recovery() {
        assert_eq!(format_recovery(&[]), "recovery log is empty\n");
    }
}
