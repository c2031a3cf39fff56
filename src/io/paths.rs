use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Environment override for the data directory
pub const DATA_DIR_ENV: &str = "NOTEPANE_DATA_DIR";

/// Sub-directory used under the platform data directory
const APP_DIR_NAME: &str = "notepane";

/// Error type for locating the data directory
#[derive(Debug, thiserror::Error)]
pub enum PathsError {
    #[error("no data directory available on this platform; pass --data-dir")]
    NoDataDir,
    #[error("could not create data directory {path}: {source}")]
    CreateError {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Every file the app reads or writes, rooted at one data directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    data_dir: PathBuf,
}

impl AppPaths {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        AppPaths {
            data_dir: data_dir.into(),
        }
    }

    /// Resolve the data directory: explicit override, then
    /// `NOTEPANE_DATA_DIR`, then the platform data dir. Creates it if needed.
    pub fn resolve(override_dir: Option<&Path>) -> Result<Self, PathsError> {
        let data_dir = match override_dir {
            Some(dir) => dir.to_path_buf(),
            None => match std::env::var_os(DATA_DIR_ENV) {
                Some(dir) if !dir.is_empty() => PathBuf::from(dir),
                _ => dirs::data_dir()
                    .ok_or(PathsError::NoDataDir)?
                    .join(APP_DIR_NAME),
            },
        };
        fs::create_dir_all(&data_dir).map_err(|e| PathsError::CreateError {
            path: data_dir.clone(),
            source: e,
        })?;
        debug!(data_dir = %data_dir.display(), "resolved data directory");
        Ok(AppPaths { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn todo_file(&self) -> PathBuf {
        self.data_dir.join("todo.json")
    }

    pub fn autosave_file(&self) -> PathBuf {
        self.data_dir.join("autosave.json")
    }

    pub fn config_file(&self) -> PathBuf {
        self.data_dir.join("config.toml")
    }

    pub fn recovery_log(&self) -> PathBuf {
        self.data_dir.join(".recovery.log")
    }

    pub fn log_file(&self) -> PathBuf {
        self.data_dir.join("notepane.log")
    }

    /// Never deleted: every writer must flock the same inode
    pub fn lock_file(&self) -> PathBuf {
        self.data_dir.join(".lock")
    }
}
