//! Integration tests for the `np` CLI.
//!
//! Each test points `np` at a temp data directory, runs it as a subprocess,
//! and checks stdout and/or the files it wrote.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use pretty_assertions::assert_eq;
use serde_json::Value;

/// Get the path to the built `np` binary.
fn np_bin() -> PathBuf {
    // cargo test builds to target/debug/
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("np");
    path
}

/// Seed a data directory with a to-do file
fn write_todos(dir: &Path, json: &str) {
    fs::write(dir.join("todo.json"), json).unwrap();
}

fn read_todos(dir: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(dir.join("todo.json")).unwrap()).unwrap()
}

/// Run `np` against the given data directory, returning (stdout, stderr, success).
fn run_np(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(np_bin())
        .arg("--data-dir")
        .arg(dir)
        .args(args)
        .env_remove("NOTEPANE_DATA_DIR")
        .output()
        .expect("failed to run np");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Run `np` expecting success, return stdout.
fn run_np_ok(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_np(dir, args);
    if !success {
        panic!(
            "np {:?} failed:\nstdout: {}\nstderr: {}",
            args, stdout, stderr
        );
    }
    stdout
}

/// Run `np` expecting failure, return stderr.
fn run_np_err(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_np(dir, args);
    if success {
        panic!("np {:?} should have failed:\nstdout: {}", args, stdout);
    }
    stderr
}

const SAMPLE: &str = r#"{
  "immediate": ["call mom", "groceries\nmilk"],
  "backlog": ["read book"],
  "done": ["filed taxes"]
}"#;

// ---------------------------------------------------------------------------
// Read command tests
// ---------------------------------------------------------------------------

#[test]
fn test_list_all_buckets() {
    let tmp = tempfile::TempDir::new().unwrap();
    write_todos(tmp.path(), SAMPLE);
    let out = run_np_ok(tmp.path(), &["list"]);
    assert_eq!(
        out,
        "Immediate (2)\n  1. [ ] call mom\n  2. [ ] groceries\n         milk\n\
         \n\
         Backlog (1)\n  1. [ ] read book\n\
         \n\
         Done (1)\n  1. [x] filed taxes\n"
    );
}

#[test]
fn test_list_missing_file_is_empty() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_np_ok(tmp.path(), &["list", "backlog"]);
    assert_eq!(out, "Backlog (0)\n  (empty)\n");
    assert!(!tmp.path().join("todo.json").exists());
}

#[test]
fn test_list_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    write_todos(tmp.path(), SAMPLE);
    let out = run_np_ok(tmp.path(), &["list", "immediate", "--json"]);
    let json: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json[0]["bucket"], "immediate");
    assert_eq!(json[0]["items"][1]["index"], 2);
    assert_eq!(json[0]["items"][1]["text"], "groceries\nmilk");
}

#[test]
fn test_list_unknown_bucket() {
    let tmp = tempfile::TempDir::new().unwrap();
    let err = run_np_err(tmp.path(), &["list", "someday"]);
    assert!(err.contains("unknown bucket 'someday'"));
}

#[test]
fn test_malformed_file_is_not_overwritten() {
    let tmp = tempfile::TempDir::new().unwrap();
    write_todos(tmp.path(), "{ not json");
    let err = run_np_err(tmp.path(), &["add", "water plants"]);
    assert!(err.contains("malformed to-do file"));
    assert_eq!(
        fs::read_to_string(tmp.path().join("todo.json")).unwrap(),
        "{ not json"
    );
    let log = fs::read_to_string(tmp.path().join(".recovery.log")).unwrap();
    assert!(log.contains("{ not json"));
}

#[test]
fn test_paths() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_np_ok(tmp.path(), &["paths", "--json"]);
    let json: Value = serde_json::from_str(&out).unwrap();
    let todo = PathBuf::from(json["todo_file"].as_str().unwrap());
    assert_eq!(todo, tmp.path().join("todo.json"));
}

// ---------------------------------------------------------------------------
// Write command tests
// ---------------------------------------------------------------------------

#[test]
fn test_add_creates_file() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_np_ok(tmp.path(), &["add", "  water plants  "]);
    run_np_ok(tmp.path(), &["add", "--backlog", "learn rust"]);
    let content = fs::read_to_string(tmp.path().join("todo.json")).unwrap();
    assert_eq!(
        content,
        "{\n  \"immediate\": [\n    \"water plants\"\n  ],\n  \"backlog\": [\n    \"learn rust\"\n  ],\n  \"done\": []\n}"
    );
}

#[test]
fn test_add_blank_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    let err = run_np_err(tmp.path(), &["add", "   "]);
    assert!(err.contains("empty"));
    assert!(!tmp.path().join("todo.json").exists());
}

#[test]
fn test_toggle_routes_between_buckets() {
    let tmp = tempfile::TempDir::new().unwrap();
    write_todos(tmp.path(), SAMPLE);

    run_np_ok(tmp.path(), &["toggle", "backlog", "1"]);
    let json = read_todos(tmp.path());
    assert_eq!(json["backlog"], serde_json::json!([]));
    assert_eq!(json["done"], serde_json::json!(["filed taxes", "read book"]));

    // unchecking lands in immediate, not the bucket it came from
    run_np_ok(tmp.path(), &["toggle", "done", "2"]);
    let json = read_todos(tmp.path());
    assert_eq!(
        json["immediate"],
        serde_json::json!(["call mom", "groceries\nmilk", "read book"])
    );
}

#[test]
fn test_toggle_out_of_range() {
    let tmp = tempfile::TempDir::new().unwrap();
    write_todos(tmp.path(), SAMPLE);
    let err = run_np_err(tmp.path(), &["toggle", "backlog", "5"]);
    assert!(err.contains("no item 5 in backlog"));
    let err = run_np_err(tmp.path(), &["toggle", "backlog", "0"]);
    assert!(err.contains("start at 1"));
}

#[test]
fn test_edit_replaces_and_blank_keeps() {
    let tmp = tempfile::TempDir::new().unwrap();
    write_todos(tmp.path(), SAMPLE);
    run_np_ok(tmp.path(), &["edit", "immediate", "1", " call dad "]);
    assert_eq!(read_todos(tmp.path())["immediate"][0], "call dad");

    let out = run_np_ok(tmp.path(), &["edit", "immediate", "1", "   "]);
    assert!(out.contains("kept the old text"));
    assert_eq!(read_todos(tmp.path())["immediate"][0], "call dad");
}

#[test]
fn test_rm() {
    let tmp = tempfile::TempDir::new().unwrap();
    write_todos(tmp.path(), SAMPLE);
    let out = run_np_ok(tmp.path(), &["rm", "immediate", "2"]);
    assert_eq!(out, "deleted: groceries\n");
    assert_eq!(
        read_todos(tmp.path())["immediate"],
        serde_json::json!(["call mom"])
    );
}

#[test]
fn test_mv_keeps_checkbox_state() {
    let tmp = tempfile::TempDir::new().unwrap();
    write_todos(tmp.path(), SAMPLE);
    run_np_ok(tmp.path(), &["mv", "immediate", "1", "backlog", "--at", "1"]);
    let json = read_todos(tmp.path());
    assert_eq!(json["immediate"], serde_json::json!(["groceries\nmilk"]));
    assert_eq!(json["backlog"], serde_json::json!(["call mom", "read book"]));

    run_np_ok(tmp.path(), &["mv", "backlog", "2", "immediate"]);
    let json = read_todos(tmp.path());
    assert_eq!(
        json["immediate"],
        serde_json::json!(["groceries\nmilk", "read book"])
    );
}

#[test]
fn test_concurrent_adds_all_land() {
    let tmp = tempfile::TempDir::new().unwrap();
    let children: Vec<_> = (0..24)
        .map(|i| {
            Command::new(np_bin())
                .arg("--data-dir")
                .arg(tmp.path())
                .args(["add", &format!("item {i}")])
                .env_remove("NOTEPANE_DATA_DIR")
                .stdout(Stdio::null())
                .spawn()
                .expect("failed to spawn np")
        })
        .collect();
    for mut child in children {
        assert!(child.wait().unwrap().success());
    }

    let json = read_todos(tmp.path());
    let mut texts: Vec<String> = json["immediate"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect();
    texts.sort();
    let mut expected: Vec<String> = (0..24).map(|i| format!("item {i}")).collect();
    expected.sort();
    assert_eq!(texts, expected);
    assert!(tmp.path().join(".lock").exists());
}

// ---------------------------------------------------------------------------
// Memo tests
// ---------------------------------------------------------------------------

#[test]
fn test_memo_import_show_export_clear() {
    let tmp = tempfile::TempDir::new().unwrap();
    let source = tmp.path().join("Notes.MD");
    fs::write(&source, "# 회의\n- item\n").unwrap();

    run_np_ok(tmp.path(), &["memo", "import", source.to_str().unwrap()]);
    assert_eq!(run_np_ok(tmp.path(), &["memo", "show"]), "# 회의\n- item\n");

    let autosave: Value =
        serde_json::from_str(&fs::read_to_string(tmp.path().join("autosave.json")).unwrap())
            .unwrap();
    assert_eq!(autosave["autoSaveContent"], "# 회의\n- item\n");

    let target = tmp.path().join("export");
    let out = run_np_ok(tmp.path(), &["memo", "export", target.to_str().unwrap()]);
    assert!(out.contains("export.md"));
    assert_eq!(
        fs::read_to_string(tmp.path().join("export.md")).unwrap(),
        "# 회의\n- item\n"
    );

    assert_eq!(run_np_ok(tmp.path(), &["memo", "clear"]), "memo cleared\n");
    assert_eq!(run_np_ok(tmp.path(), &["memo", "show"]), "");
}

#[test]
fn test_memo_import_rejects_other_extensions() {
    let tmp = tempfile::TempDir::new().unwrap();
    let source = tmp.path().join("notes.txt");
    fs::write(&source, "plain").unwrap();
    run_np_err(tmp.path(), &["memo", "import", source.to_str().unwrap()]);
    assert!(!tmp.path().join("autosave.json").exists());
}

#[test]
fn test_memo_show_json_without_memo() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_np_ok(tmp.path(), &["memo", "show", "--json"]);
    let json: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["content"], Value::Null);
}

// ---------------------------------------------------------------------------
// Recovery tests
// ---------------------------------------------------------------------------

#[test]
fn test_recovery_lists_and_clears() {
    let tmp = tempfile::TempDir::new().unwrap();
    assert_eq!(
        run_np_ok(tmp.path(), &["recovery"]),
        "recovery log is empty\n"
    );

    write_todos(tmp.path(), "[1, 2");
    run_np_err(tmp.path(), &["list"]);

    let out = run_np_ok(tmp.path(), &["recovery", "--json"]);
    let json: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["category"], "parser");

    assert_eq!(
        run_np_ok(tmp.path(), &["recovery", "--clear"]),
        "cleared 1 recovery entries\n"
    );
    assert_eq!(
        run_np_ok(tmp.path(), &["recovery"]),
        "recovery log is empty\n"
    );
}
