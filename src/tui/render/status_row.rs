use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::helpers::spans_width;
use crate::tui::app::{App, Mode, Pane, PromptKind};
use crate::util::unicode;

/// Key hints for the current pane and mode
fn hint(app: &App) -> &'static str {
    match (app.mode, app.focus) {
        (Mode::Edit, _) => "Enter save  Shift+Enter newline  Esc cancel",
        (Mode::Move, _) => "j/k move  Enter drop  Esc put back",
        (Mode::Add, _) => "Enter add  Tab bucket  Esc close",
        (_, Pane::Memo) => "^F find  ^S save as  ^O open  ^N new  Alt+1-4 heading  Tab pane",
        (_, Pane::Todo) => "a add  e edit  x done  d delete  m move  h done  z fold  Tab pane",
        (_, Pane::Chat) => "1-9 tab  Enter open  [ ] resize  Tab pane  ^Q quit",
    }
}

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let bright = Style::default().fg(app.theme.text_bright).bg(bg);
    let dim = Style::default().fg(app.theme.dim).bg(bg);

    // Left side, right-aligned extra, and the text cursor column if any
    let (mut spans, right, cursor) = match (app.mode, &app.path_prompt) {
        (Mode::Prompt, Some(prompt)) => {
            let label = match prompt.kind {
                PromptKind::Open => "Open: ",
                PromptKind::SaveAs => "Save as: ",
            };
            let col = unicode::display_width(label)
                + unicode::byte_offset_to_display_col(prompt.input.text(), prompt.input.cursor());
            (
                vec![
                    Span::styled(label, Style::default().fg(app.theme.highlight).bg(bg)),
                    Span::styled(prompt.input.text().to_string(), bright),
                ],
                "Enter confirm  Esc cancel".to_string(),
                Some(col),
            )
        }
        (Mode::Search, _) => {
            let query = &app.search.query;
            let col = unicode::display_width("Find: ")
                + unicode::byte_offset_to_display_col(query.text(), query.cursor());
            (
                vec![
                    Span::styled("Find: ", Style::default().fg(app.theme.highlight).bg(bg)),
                    Span::styled(query.text().to_string(), bright),
                ],
                app.search.counter(),
                Some(col),
            )
        }
        _ => {
            let left = match app.status_text(Instant::now()) {
                Some(text) => vec![Span::styled(text.to_string(), bright)],
                None => Vec::new(),
            };
            let right = if app.ctx.config.ui.show_key_hints {
                hint(app).to_string()
            } else {
                String::new()
            };
            (left, right, None)
        }
    };

    let used = spans_width(&spans);
    let right_width = unicode::display_width(&right);
    if used + right_width < width {
        spans.push(Span::styled(" ".repeat(width - used - right_width), dim));
        spans.push(Span::styled(right, dim));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);

    if let Some(col) = cursor {
        let x = area.x + col.min(width.saturating_sub(1)) as u16;
        frame.set_cursor_position(Position::new(x, area.y));
    }
}
