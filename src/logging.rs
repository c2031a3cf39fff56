//! Tracing subscriber setup.
//!
//! The TUI owns the terminal, so its diagnostics go to a log file in the data
//! directory. CLI commands write to stderr. Both honour `NOTEPANE_LOG`
//! (an `EnvFilter` directive such as `debug` or `notepane=trace`).

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::io::paths::AppPaths;

/// Filter directive variable
pub const LOG_ENV: &str = "NOTEPANE_LOG";

fn filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default))
}

/// Log to `<data-dir>/notepane.log`. Falls back to no logging when the file
/// cannot be opened; the UI still runs.
pub fn init_tui(paths: &AppPaths) {
    let file = match OpenOptions::new()
        .create(true)
        .append(true)
        .open(paths.log_file())
    {
        Ok(f) => f,
        Err(_) => return,
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter("info"))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init();
}

/// Log warnings and errors to stderr
pub fn init_cli() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter("warn"))
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
