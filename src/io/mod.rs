pub mod autosave;
pub mod config_io;
pub mod lock;
pub mod memo_io;
pub mod paths;
pub mod recovery;
pub mod todo_store;
