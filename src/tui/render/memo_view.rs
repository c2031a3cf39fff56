use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::helpers::{scroll_to_show, wrap_text};
use super::pane_block;
use crate::ops::memo_ops::heading_level;
use crate::tui::app::{App, Mode, Pane};

/// Render the memo editor pane
pub fn render_memo_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = pane_block(app, Pane::Memo, format!("Memo \u{00B7} {}", app.memo.title()));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.width == 0 || inner.height == 0 {
        return;
    }
    let width = inner.width as usize;
    let height = inner.height as usize;
    app.memo_page = height;

    let base = app.theme.base();
    let heading = Style::default()
        .fg(app.theme.text_bright)
        .bg(app.theme.background)
        .add_modifier(Modifier::BOLD);

    // Matches are only drawn while the find bar is open
    let highlights: Vec<_> = if app.mode == Mode::Search {
        let active = app.search.active_match();
        app.search
            .matches()
            .iter()
            .map(|m| {
                let style = if Some(m) == active.as_ref() {
                    app.theme.search_active()
                } else {
                    app.theme.search_match()
                };
                (m.clone(), style)
            })
            .collect()
    } else {
        Vec::new()
    };

    let wrapped = wrap_text(
        app.memo.text(),
        Some(app.memo.buffer.cursor()),
        width,
        |line| {
            if heading_level(line).is_some() {
                heading
            } else {
                base
            }
        },
        &highlights,
    );

    let (cursor_row, cursor_col) = wrapped.cursor.unwrap_or((0, 0));
    app.memo_scroll = scroll_to_show(app.memo_scroll, cursor_row, 1, height);

    let lines = if app.memo.text().is_empty() && app.focus != Pane::Memo {
        vec![Line::from(Span::styled("empty memo", app.theme.dimmed()))]
    } else {
        wrapped.lines
    };
    let paragraph = Paragraph::new(lines)
        .style(base)
        .scroll((app.memo_scroll as u16, 0));
    frame.render_widget(paragraph, inner);

    if app.focus == Pane::Memo && app.mode == Mode::Navigate {
        let x = inner.x + (cursor_col.min(width - 1)) as u16;
        let y = inner.y + cursor_row.saturating_sub(app.memo_scroll) as u16;
        frame.set_cursor_position(Position::new(x, y));
    }
}
