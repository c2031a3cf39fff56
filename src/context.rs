use std::path::Path;

use crate::io::autosave::AutosaveStore;
use crate::io::config_io::{self, ConfigError};
use crate::io::paths::{AppPaths, PathsError};
use crate::io::todo_store::TodoStore;
use crate::model::config::AppConfig;

/// Error type for building the application context
#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error(transparent)]
    Paths(#[from] PathsError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Everything a session needs to reach the disk: resolved paths, parsed
/// config and the two persistence channels. Built once at startup and
/// handed to the UI or a CLI command.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub paths: AppPaths,
    pub config: AppConfig,
    pub store: TodoStore,
    pub autosave: AutosaveStore,
}

impl AppContext {
    /// Resolve the data directory (see [`AppPaths::resolve`]) and read its
    /// config.
    pub fn open(data_dir: Option<&Path>) -> Result<Self, ContextError> {
        let paths = AppPaths::resolve(data_dir)?;
        let config = config_io::read_config(&paths)?;
        Ok(Self::with_config(paths, config))
    }

    pub fn with_config(paths: AppPaths, config: AppConfig) -> Self {
        AppContext {
            store: TodoStore::new(paths.clone()),
            autosave: AutosaveStore::new(&paths),
            paths,
            config,
        }
    }
}
