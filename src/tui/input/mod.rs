mod chat;
mod memo;
mod prompt;
mod todo;

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{App, Mode, Pane, PromptKind};
use crate::util::TextBuffer;

/// Handle a key event in the current mode, then write any save that became
/// due because of it.
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }
    if !handle_global(app, key) {
        match app.mode {
            Mode::Navigate => match app.focus {
                Pane::Memo => memo::handle_memo(app, key),
                Pane::Todo => todo::handle_navigate(app, key),
                Pane::Chat => chat::handle_chat(app, key),
            },
            Mode::Edit => todo::handle_edit(app, key),
            Mode::Move => todo::handle_move(app, key),
            Mode::Add => todo::handle_add(app, key),
            Mode::Prompt => prompt::handle_prompt(app, key),
            Mode::Search => memo::handle_search(app, key),
        }
    }
    app.flush_saves(Instant::now(), false);
}

/// Keys that work from every pane. Returns true when the key was consumed.
fn handle_global(app: &mut App, key: KeyEvent) -> bool {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('q') if ctrl => app.quit(),
        KeyCode::Char('s') if ctrl && app.mode != Mode::Prompt => {
            app.open_prompt(PromptKind::SaveAs)
        }
        KeyCode::Char('o') if ctrl && app.mode != Mode::Prompt => {
            app.open_prompt(PromptKind::Open)
        }
        KeyCode::Char('n') if ctrl && app.mode != Mode::Prompt => app.new_memo(),
        KeyCode::Char('f') if ctrl && app.mode != Mode::Prompt => app.open_search(),
        // The add prompt uses Tab to switch its target bucket
        KeyCode::Tab if app.mode != Mode::Add => app.cycle_focus(true),
        KeyCode::BackTab if app.mode != Mode::Add => app.cycle_focus(false),
        _ => return false,
    }
    true
}

/// Handle a bracketed paste: inserted into whichever text field has focus.
pub fn handle_paste(app: &mut App, text: &str) {
    if text.is_empty() {
        return;
    }
    let text = text.replace("\r\n", "\n");
    match app.mode {
        Mode::Navigate if app.focus == Pane::Memo => {
            app.memo.buffer.insert_str(&text);
            app.memo_changed();
        }
        Mode::Edit => {
            if let Some(edit) = &mut app.edit {
                edit.buffer.insert_str(&text);
            }
        }
        // Single-line fields: newlines become spaces
        Mode::Add => app.add_prompt.input.insert_str(&text.replace('\n', " ")),
        Mode::Prompt => {
            if let Some(prompt) = &mut app.path_prompt {
                prompt.input.insert_str(text.trim());
            }
        }
        Mode::Search => {
            app.search.query.insert_str(&text.replace('\n', " "));
            app.refresh_search();
        }
        _ => {}
    }
    app.flush_saves(Instant::now(), false);
}

/// Cursor movement and deletion shared by every text field. Returns
/// `Some(changed)` when the key was a field key, `None` otherwise.
pub(super) fn edit_field(buffer: &mut TextBuffer, key: KeyEvent) -> Option<bool> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    match key.code {
        KeyCode::Char(c) if !ctrl && !alt => {
            buffer.insert_char(c);
            Some(true)
        }
        KeyCode::Backspace => Some(buffer.backspace()),
        KeyCode::Delete => Some(buffer.delete()),
        KeyCode::Left if ctrl || alt => {
            buffer.word_left();
            Some(false)
        }
        KeyCode::Right if ctrl || alt => {
            buffer.word_right();
            Some(false)
        }
        KeyCode::Left => {
            buffer.move_left();
            Some(false)
        }
        KeyCode::Right => {
            buffer.move_right();
            Some(false)
        }
        KeyCode::Home if ctrl => {
            buffer.buffer_start();
            Some(false)
        }
        KeyCode::End if ctrl => {
            buffer.buffer_end();
            Some(false)
        }
        KeyCode::Home => {
            buffer.line_start();
            Some(false)
        }
        KeyCode::End => {
            buffer.line_end();
            Some(false)
        }
        KeyCode::Up => {
            buffer.move_up();
            Some(false)
        }
        KeyCode::Down => {
            buffer.move_down();
            Some(false)
        }
        _ => None,
    }
}

/// `[` and `]` resize the focused pane outside text entry
pub(super) fn handle_resize(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('[') => app.resize_focused(false),
        KeyCode::Char(']') => app.resize_focused(true),
        _ => return false,
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn tab_cycles_focus() {
        let (_tmp, mut app) = app_with_todos(&[], &[], &[]);
        assert_eq!(app.focus, Pane::Memo);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, Pane::Todo);
        press(&mut app, KeyCode::BackTab);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.focus, Pane::Chat);
    }

    #[test]
    fn ctrl_q_quits_from_anywhere() {
        let (_tmp, mut app) = app_with_todos(&[], &[], &[]);
        handle_key(&mut app, ctrl('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn paste_into_memo_keeps_newlines() {
        let (_tmp, mut app) = app_with_todos(&[], &[], &[]);
        handle_paste(&mut app, "one\r\ntwo");
        assert_eq!(app.memo.text(), "one\ntwo");
    }

    #[test]
    fn paste_into_add_prompt_is_one_line() {
        let (_tmp, mut app) = app_with_todos(&[], &[], &[]);
        app.focus = Pane::Todo;
        press(&mut app, KeyCode::Char('a'));
        handle_paste(&mut app, "milk\neggs");
        assert_eq!(app.add_prompt.input.text(), "milk eggs");
    }
}
