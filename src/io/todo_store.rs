use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::lock::{LOCK_TIMEOUT, LockError, WriteGuard};
use super::paths::AppPaths;
use super::recovery::{self, RecoveryCategory, RecoveryEntry};
use crate::model::todo::{Bucket, TodoCollection};

/// Error type for to-do file I/O
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
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
    #[error("malformed to-do file: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error(transparent)]
    Lock(#[from] LockError),
}

/// On-disk shape of todo.json: three plain string arrays.
///
/// Field order is the serialization order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoFile {
    #[serde(default)]
    pub immediate: Vec<String>,
    #[serde(default)]
    pub backlog: Vec<String>,
    #[serde(default)]
    pub done: Vec<String>,
}

impl TodoFile {
    pub fn from_collection(collection: &TodoCollection) -> Self {
        TodoFile {
            immediate: collection.texts(Bucket::Immediate),
            backlog: collection.texts(Bucket::Backlog),
            done: collection.texts(Bucket::Done),
        }
    }

    pub fn into_collection(self) -> TodoCollection {
        TodoCollection::from_lists(self.immediate, self.backlog, self.done)
    }

    /// Pretty JSON with two-space indentation
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Loads the to-do file once and rewrites it after every mutation.
#[derive(Debug, Clone)]
pub struct TodoStore {
    paths: AppPaths,
}

impl TodoStore {
    pub fn new(paths: AppPaths) -> Self {
        TodoStore { paths }
    }

    pub fn path(&self) -> PathBuf {
        self.paths.todo_file()
    }

    /// The persisted collection, or None when the file is absent or
    /// malformed. A malformed file is copied to the recovery log.
    pub fn load(&self) -> Option<TodoCollection> {
        match self.read() {
            Ok(Some(file)) => {
                let collection = file.into_collection();
                info!(items = collection.len(), "loaded to-do file");
                Some(collection)
            }
            Ok(None) => {
                debug!(path = %self.path().display(), "no to-do file yet");
                None
            }
            Err(e) => {
                warn!(error = %e, "ignoring unreadable to-do file");
                None
            }
        }
    }

    /// Parse the file, distinguishing "absent" from "broken"
    pub fn read(&self) -> Result<Option<TodoFile>, StoreError> {
        let path = self.path();
        let content = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::ReadError { path, source: e }),
        };
        match serde_json::from_str::<TodoFile>(&content) {
            Ok(file) => Ok(Some(file)),
            Err(e) => {
                recovery::log_recovery(
                    &self.paths,
                    RecoveryEntry::new(RecoveryCategory::Parser, "to-do file unreadable")
                        .field("Source", path.display().to_string())
                        .field("Error", e.to_string())
                        .body(content),
                );
                Err(StoreError::Malformed(e))
            }
        }
    }

    /// Replace the file with `collection`. Returns false on any failure;
    /// the content that could not be written goes to the recovery log.
    pub fn save(&self, collection: &TodoCollection) -> bool {
        match self.try_save(collection) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "to-do save failed");
                false
            }
        }
    }

    /// Like [`TodoStore::save`] but reports why it failed
    pub fn try_save(&self, collection: &TodoCollection) -> Result<(), StoreError> {
        match self.lock() {
            Ok(guard) => self.write_locked(collection, &guard),
            Err(e) => {
                let content = TodoFile::from_collection(collection)
                    .to_json()
                    .unwrap_or_default();
                self.log_unwritten(content, &e);
                Err(e)
            }
        }
    }

    /// Exclusive hold on the file. Take it before [`TodoStore::read`] when
    /// the result will be written back.
    pub fn lock(&self) -> Result<WriteGuard, StoreError> {
        Ok(WriteGuard::acquire(&self.paths.lock_file(), LOCK_TIMEOUT)?)
    }

    /// Replace the file while the caller holds the lock
    pub fn write_locked(
        &self,
        collection: &TodoCollection,
        _guard: &WriteGuard,
    ) -> Result<(), StoreError> {
        let content = TodoFile::from_collection(collection).to_json()?;
        let path = self.path();
        match recovery::atomic_write(&path, content.as_bytes()) {
            Ok(()) => {
                debug!(items = collection.len(), "saved to-do file");
                Ok(())
            }
            Err(source) => {
                let e = StoreError::WriteError { path, source };
                self.log_unwritten(content, &e);
                Err(e)
            }
        }
    }

    fn log_unwritten(&self, content: String, error: &StoreError) {
        recovery::log_recovery(
            &self.paths,
            RecoveryEntry::new(RecoveryCategory::Write, "to-do write failed")
                .field("Target", self.path().display().to_string())
                .field("Error", error.to_string())
                .body(content),
        );
    }
}
