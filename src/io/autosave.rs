use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use indexmap::IndexMap;
use tracing::{debug, warn};

use super::paths::AppPaths;
use super::recovery::{self, RecoveryCategory, RecoveryEntry, atomic_write};

/// Key the memo text lives under
pub const MEMO_AUTOSAVE_KEY: &str = "autoSaveContent";

/// Error type for the autosave file
#[derive(Debug, thiserror::Error)]
pub enum AutosaveError {
    #[error("could not access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not encode autosave data: {0}")]
    Encode(#[from] serde_json::Error),
}

/// String key/value store backed by `autosave.json`.
///
/// Independent of the to-do file. Unknown keys are kept in their original
/// order when a value is written.
#[derive(Debug, Clone)]
pub struct AutosaveStore {
    path: PathBuf,
    paths: AppPaths,
}

impl AutosaveStore {
    pub fn new(paths: &AppPaths) -> Self {
        AutosaveStore {
            path: paths.autosave_file(),
            paths: paths.clone(),
        }
    }

    /// Current entries. A missing or unreadable file is an empty store.
    /// With `preserve`, a malformed file is copied to the recovery log
    /// first, since the caller is about to overwrite it.
    fn entries(&self, preserve: bool) -> IndexMap<String, String> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) => {
                if e.kind() != ErrorKind::NotFound {
                    warn!(error = %e, "could not read autosave file");
                }
                return IndexMap::new();
            }
        };
        match serde_json::from_str(&content) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "autosave file is malformed, starting fresh");
                if preserve {
                    recovery::log_recovery(
                        &self.paths,
                        RecoveryEntry::new(RecoveryCategory::Parser, "autosave file unreadable")
                            .field("Source", self.path.display().to_string())
                            .field("Error", e.to_string())
                            .body(content),
                    );
                }
                IndexMap::new()
            }
        }
    }

    fn write_entries(&self, entries: &IndexMap<String, String>) -> Result<(), AutosaveError> {
        let content = serde_json::to_string_pretty(entries)?;
        atomic_write(&self.path, content.as_bytes()).map_err(|e| AutosaveError::Io {
            path: self.path.clone(),
            source: e,
        })
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries(false).shift_remove(key)
    }

    pub fn set(&self, key: &str, value: &str) -> Result<(), AutosaveError> {
        let mut entries = self.entries(true);
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries)?;
        debug!(key, bytes = value.len(), "autosaved");
        Ok(())
    }

    /// Drop a key. Returns whether it was present.
    pub fn remove(&self, key: &str) -> Result<bool, AutosaveError> {
        let mut entries = self.entries(true);
        if entries.shift_remove(key).is_none() {
            return Ok(false);
        }
        self.write_entries(&entries)?;
        Ok(true)
    }
}
