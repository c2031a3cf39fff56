use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::edit_field;
use crate::ops::memo_ops;
use crate::tui::app::{App, Mode};

pub(super) fn handle_memo(app: &mut App, key: KeyEvent) {
    let modified = key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
    let page = app.memo_page.max(1) as isize;
    let buffer = &mut app.memo.buffer;

    let changed = match key.code {
        KeyCode::Char(c @ '1'..='4') if modified => {
            let level = (c != '4').then(|| c as u8 - b'0');
            memo_ops::set_heading(buffer, level);
            true
        }
        KeyCode::Enter => {
            buffer.newline();
            true
        }
        KeyCode::PageUp => {
            buffer.move_lines(-page);
            false
        }
        KeyCode::PageDown => {
            buffer.move_lines(page);
            false
        }
        _ => edit_field(buffer, key).unwrap_or(false),
    };
    if changed {
        app.memo_changed();
    }
}

pub(super) fn handle_search(app: &mut App, key: KeyEvent) {
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);
    match key.code {
        KeyCode::Esc => app.mode = Mode::Navigate,
        KeyCode::Enter | KeyCode::Down | KeyCode::Up => {
            let forward = match key.code {
                KeyCode::Up => false,
                KeyCode::Enter => !shift,
                _ => true,
            };
            if let Some(m) = app.search.step(forward) {
                app.memo.buffer.set_cursor(m.start);
            }
        }
        _ => {
            if edit_field(&mut app.search.query, key) == Some(true) {
                app.refresh_search();
            }
        }
    }
}
