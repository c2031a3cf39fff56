use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::{edit_field, handle_resize};
use crate::model::todo::Bucket;
use crate::tui::app::{App, Mode};

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    if handle_resize(app, key) {
        return;
    }
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.move_cursor(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_cursor(-1),
        KeyCode::Char('g') | KeyCode::Home => app.move_cursor(isize::MIN),
        KeyCode::Char('G') | KeyCode::End => app.move_cursor(isize::MAX),
        KeyCode::Char('a') => {
            app.add_prompt.input.clear();
            app.mode = Mode::Add;
        }
        KeyCode::Enter | KeyCode::Char('e') => app.begin_edit(),
        KeyCode::Char(' ') | KeyCode::Char('x') => app.toggle_selected(),
        KeyCode::Char('d') | KeyCode::Delete => app.delete_selected(),
        KeyCode::Char('m') => app.begin_move(),
        KeyCode::Char('h') => app.toggle_show_done(),
        KeyCode::Char('z') => app.toggle_collapse(),
        KeyCode::Char('q') => app.quit(),
        _ => {}
    }
}

pub(super) fn handle_edit(app: &mut App, key: KeyEvent) {
    let newline = key.modifiers.intersects(KeyModifiers::SHIFT | KeyModifiers::ALT);
    match key.code {
        KeyCode::Esc => app.cancel_edit(),
        KeyCode::Enter if newline => {
            if let Some(edit) = &mut app.edit {
                edit.buffer.newline();
            }
        }
        KeyCode::Enter => app.commit_edit(),
        _ => {
            if let Some(edit) = &mut app.edit {
                edit_field(&mut edit.buffer, key);
            }
        }
    }
}

pub(super) fn handle_add(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.mode = Mode::Navigate,
        KeyCode::Tab | KeyCode::BackTab => {
            app.add_prompt.target = match app.add_prompt.target {
                Bucket::Immediate => Bucket::Backlog,
                _ => Bucket::Immediate,
            };
        }
        KeyCode::Enter => app.add_from_prompt(),
        _ => {
            edit_field(&mut app.add_prompt.input, key);
        }
    }
}

pub(super) fn handle_move(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.move_step(true),
        KeyCode::Char('k') | KeyCode::Up => app.move_step(false),
        KeyCode::Enter | KeyCode::Char('m') => app.drop_move(),
        KeyCode::Esc => app.cancel_move(),
        _ => {}
    }
}
