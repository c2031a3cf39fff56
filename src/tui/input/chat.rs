use crossterm::event::{KeyCode, KeyEvent};
use tracing::{info, warn};

use super::handle_resize;
use crate::tui::app::App;

pub(super) fn handle_chat(app: &mut App, key: KeyEvent) {
    if handle_resize(app, key) {
        return;
    }
    let tabs = app.ctx.config.chat.tabs.len();
    match key.code {
        KeyCode::Char(c @ '1'..='9') => {
            let idx = (c as u8 - b'1') as usize;
            if idx < tabs {
                app.chat_tab = idx;
            }
        }
        KeyCode::Char('l') | KeyCode::Right if tabs > 0 => {
            app.chat_tab = (app.chat_tab + 1) % tabs;
        }
        KeyCode::Char('h') | KeyCode::Left if tabs > 0 => {
            app.chat_tab = (app.chat_tab + tabs - 1) % tabs;
        }
        KeyCode::Enter | KeyCode::Char('o') => open_selected(app),
        KeyCode::Char('q') => app.quit(),
        _ => {}
    }
}

fn open_selected(app: &mut App) {
    let Some(url) = app.selected_chat_url().map(str::to_string) else {
        app.set_status("no chat configured");
        return;
    };
    match open::that_detached(&url) {
        Ok(()) => {
            info!(%url, "opened chat in browser");
            app.set_status(format!("opened {url}"));
        }
        Err(e) => {
            warn!(%url, error = %e, "could not open browser");
            app.set_status(format!("could not open {url}: {e}"));
        }
    }
}
