use std::fs;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use tempfile::TempDir;

use crate::context::AppContext;
use crate::io::paths::AppPaths;
use crate::io::todo_store::TodoFile;
use crate::model::config::AppConfig;
use crate::tui::app::App;
use crate::tui::input;

pub const TERM_W: u16 = 100;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// An App over a temp data dir seeded with raw file contents.
pub fn app_with_files(todo_json: &str, autosave_json: Option<&str>) -> (TempDir, App) {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("todo.json"), todo_json).unwrap();
    if let Some(json) = autosave_json {
        fs::write(tmp.path().join("autosave.json"), json).unwrap();
    }
    let app = app_in(&tmp, AppConfig::default());
    (tmp, app)
}

/// An App whose to-do file holds the given buckets.
pub fn app_with_todos(immediate: &[&str], backlog: &[&str], done: &[&str]) -> (TempDir, App) {
    let own = |v: &[&str]| v.iter().map(|s| s.to_string()).collect();
    let file = TodoFile {
        immediate: own(immediate),
        backlog: own(backlog),
        done: own(done),
    };
    app_with_files(&file.to_json().unwrap(), None)
}

pub fn app_in(tmp: &TempDir, config: AppConfig) -> App {
    App::new(AppContext::with_config(AppPaths::new(tmp.path()), config))
}

/// The to-do file as it is on disk right now
pub fn saved_todos(tmp: &TempDir) -> TodoFile {
    serde_json::from_str(&fs::read_to_string(tmp.path().join("todo.json")).unwrap()).unwrap()
}

pub fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

pub fn ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
}

pub fn alt(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::ALT)
}

pub fn shift(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::SHIFT)
}

pub fn press(app: &mut App, code: KeyCode) {
    input::handle_key(app, key(code));
}

pub fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        input::handle_key(app, key(KeyCode::Char(c)));
    }
}
