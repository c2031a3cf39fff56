use crossterm::event::{KeyCode, KeyEvent};
use tracing::warn;

use super::edit_field;
use crate::io::memo_io;
use crate::tui::app::{App, Mode, Pane, PromptKind};

pub(super) fn handle_prompt(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => close(app),
        KeyCode::Enter => submit(app),
        _ => {
            if let Some(prompt) = &mut app.path_prompt {
                edit_field(&mut prompt.input, key);
            }
        }
    }
}

fn close(app: &mut App) {
    app.path_prompt = None;
    app.mode = Mode::Navigate;
}

/// Run the open/save for the entered path. An empty path is a cancel.
fn submit(app: &mut App) {
    let Some(prompt) = app.path_prompt.take() else {
        close(app);
        return;
    };
    close(app);
    let input = prompt.input.text().trim();
    if input.is_empty() {
        return;
    }
    let path = memo_io::expand_home(input);

    match prompt.kind {
        PromptKind::SaveAs => match memo_io::save_markdown(&path, app.memo.text()) {
            Ok(written) => {
                app.set_status(format!("saved {}", written.display()));
                app.memo.path = Some(written);
            }
            Err(e) => {
                warn!(error = %e, "memo save failed");
                app.set_status(e.to_string());
            }
        },
        PromptKind::Open => match memo_io::open_markdown(&path) {
            Ok(text) => {
                app.memo.replace(text, Some(path.clone()));
                app.memo_scroll = 0;
                app.memo_changed();
                app.focus = Pane::Memo;
                app.set_status(format!("opened {}", path.display()));
            }
            Err(e) => {
                warn!(error = %e, "memo open failed");
                app.set_status(e.to_string());
            }
        },
    }
}
