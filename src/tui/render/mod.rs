pub mod chat_view;
mod helpers;
pub mod memo_view;
pub mod status_row;
pub mod todo_view;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, Borders};

use super::app::{App, Pane};

/// Main render function: three panes over a one-row status line
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Background fill
    frame.render_widget(Block::default().style(app.theme.base()), area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);

    let widths = pane_widths(
        rows[0].width,
        app.sizes,
        app.ctx.config.layout.min_widths,
    );
    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(widths.map(Constraint::Length))
        .split(rows[0]);

    memo_view::render_memo_view(frame, app, panes[0]);
    todo_view::render_todo_view(frame, app, panes[1]);
    chat_view::render_chat_view(frame, app, panes[2]);
    status_row::render_status_row(frame, app, rows[1]);
}

/// Split `total` cells by the `sizes` proportions, then raise panes to their
/// minimum width by taking cells from panes that have room to spare. When
/// the minimums cannot all fit, the proportional split is used as is.
pub fn pane_widths(total: u16, sizes: [u16; 3], min_widths: [u16; 3]) -> [u16; 3] {
    let sum: u32 = sizes.iter().map(|s| u32::from(*s)).sum();
    let mut widths = if sum == 0 {
        [total / 3; 3]
    } else {
        sizes.map(|s| (u32::from(total) * u32::from(s) / sum) as u16)
    };
    let used: u16 = widths.iter().sum();
    widths[2] += total - used;

    let min_total: u32 = min_widths.iter().map(|m| u32::from(*m)).sum();
    if min_total > u32::from(total) {
        return widths;
    }
    for i in 0..3 {
        while widths[i] < min_widths[i] {
            let donor = (0..3)
                .filter(|j| *j != i && widths[*j] > min_widths[*j])
                .max_by_key(|j| widths[*j] - min_widths[*j]);
            match donor {
                Some(j) => {
                    widths[j] -= 1;
                    widths[i] += 1;
                }
                None => break,
            }
        }
    }
    widths
}

/// Bordered block for a pane; the focused pane gets the highlight color.
pub(super) fn pane_block<'a>(app: &App, pane: Pane, title: String) -> Block<'a> {
    let focused = app.focus == pane;
    let border = if focused {
        app.theme.highlight
    } else {
        app.theme.border
    };
    let title_style = if focused {
        Style::default()
            .fg(app.theme.text_bright)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.dim)
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border).bg(app.theme.background))
        .title(Span::styled(format!(" {title} "), title_style))
        .style(app.theme.base())
}
