use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use super::recovery::atomic_write;

/// The only extension the open/save prompts accept
pub const MARKDOWN_EXT: &str = "md";

/// Error type for markdown file I/O
#[derive(Debug, thiserror::Error)]
pub enum MemoIoError {
    #[error("{0} is not a markdown (.md) file")]
    NotMarkdown(PathBuf),
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(MARKDOWN_EXT))
}

/// Expand a leading `~/` so prompt input behaves like a shell path
pub fn expand_home(input: &str) -> PathBuf {
    match input.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(input)),
        None => PathBuf::from(input),
    }
}

/// Where a save actually goes: a path without an extension gets `.md`.
pub fn normalize_save_path(path: &Path) -> PathBuf {
    if path.extension().is_none() {
        path.with_extension(MARKDOWN_EXT)
    } else {
        path.to_path_buf()
    }
}

/// Read a markdown file verbatim
pub fn open_markdown(path: &Path) -> Result<String, MemoIoError> {
    if !is_markdown(path) {
        return Err(MemoIoError::NotMarkdown(path.to_path_buf()));
    }
    let content = fs::read_to_string(path).map_err(|e| MemoIoError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    info!(path = %path.display(), bytes = content.len(), "opened markdown file");
    Ok(content)
}

/// Write raw markdown, returning the path written
pub fn save_markdown(path: &Path, content: &str) -> Result<PathBuf, MemoIoError> {
    let target = normalize_save_path(path);
    atomic_write(&target, content.as_bytes()).map_err(|e| MemoIoError::WriteError {
        path: target.clone(),
        source: e,
    })?;
    info!(path = %target.display(), bytes = content.len(), "saved markdown file");
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn save_appends_extension_when_missing() {
        let tmp = TempDir::new().unwrap();
        let written = save_markdown(&tmp.path().join("meeting"), "# Meeting\n").unwrap();
        assert_eq!(written, tmp.path().join("meeting.md"));
        assert_eq!(fs::read_to_string(written).unwrap(), "# Meeting\n");
    }

    #[test]
    fn save_keeps_explicit_extension() {
        assert_eq!(
            normalize_save_path(Path::new("notes.markdown")),
            PathBuf::from("notes.markdown")
        );
        assert_eq!(
            normalize_save_path(Path::new("dir/notes")),
            PathBuf::from("dir/notes.md")
        );
    }

    #[test]
    fn open_round_trips_raw_text() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a.MD");
        fs::write(&path, "line 1\r\nline 2").unwrap();
        assert_eq!(open_markdown(&path).unwrap(), "line 1\r\nline 2");
    }

    #[test]
    fn open_rejects_other_extensions() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a.txt");
        fs::write(&path, "x").unwrap();
        assert!(matches!(
            open_markdown(&path),
            Err(MemoIoError::NotMarkdown(_))
        ));
    }

    #[test]
    fn open_missing_file() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            open_markdown(&tmp.path().join("gone.md")),
            Err(MemoIoError::ReadError { .. })
        ));
    }

    #[test]
    fn home_expansion_only_for_tilde_slash() {
        assert_eq!(expand_home("notes.md"), PathBuf::from("notes.md"));
        assert_eq!(expand_home("~notes.md"), PathBuf::from("~notes.md"));
    }
}
