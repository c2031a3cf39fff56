use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use super::pane_block;
use crate::tui::app::{App, Pane};

/// Render the chat pane: one row per configured tab, the selected URL and
/// how to open it
pub fn render_chat_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = pane_block(app, Pane::Chat, "Chat".to_string());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let tabs = &app.ctx.config.chat.tabs;
    let mut lines: Vec<Line> = Vec::new();
    if tabs.is_empty() {
        lines.push(Line::from(Span::styled(
            "no chat tabs configured",
            app.theme.dimmed(),
        )));
    }
    for (i, tab) in tabs.iter().enumerate() {
        let selected = i == app.chat_tab;
        let style = if selected {
            Style::default()
                .fg(app.theme.text_bright)
                .bg(app.theme.selection_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            app.theme.base()
        };
        let number = if i < 9 {
            format!("{} ", i + 1)
        } else {
            "  ".to_string()
        };
        lines.push(Line::from(vec![
            Span::styled(number, app.theme.dimmed()),
            Span::styled(tab.name.clone(), style),
        ]));
    }

    if let Some(url) = app.selected_chat_url() {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            url.to_string(),
            Style::default()
                .fg(app.theme.cyan)
                .bg(app.theme.background)
                .add_modifier(Modifier::UNDERLINED),
        )));
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "Enter opens it in your browser",
            app.theme.dimmed(),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .style(app.theme.base())
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, inner);
}
