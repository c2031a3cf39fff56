use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::helpers::{scroll_to_show, spans_width, wrap_text};
use super::pane_block;
use crate::model::todo::{Bucket, TodoItem};
use crate::ops::inline_edit::InlineEdit;
use crate::tui::app::{App, Mode, Pane, TodoCursor};
use crate::util::unicode;

/// Cells taken by the checkbox column
const CHECKBOX_WIDTH: usize = 4;

/// Lines for the list plus what the scroller and cursor need to know
struct ListLines {
    lines: Vec<Line<'static>>,
    /// First row and height of the selected entry
    selected: Option<(usize, usize)>,
    /// Text cursor (row, col) while an item is being edited
    cursor: Option<(usize, usize)>,
}

/// Render the to-do pane: optional add prompt, then each visible bucket
pub fn render_todo_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = pane_block(app, Pane::Todo, "To-do".to_string());
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let list_area = if app.mode == Mode::Add && app.focus == Pane::Todo {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(inner);
        render_add_prompt(frame, app, chunks[0]);
        chunks[1]
    } else {
        inner
    };
    if list_area.height == 0 {
        return;
    }

    let list = build_lines(app, list_area.width as usize);
    let height = list_area.height as usize;
    if let Some((row, rows)) = list.selected {
        app.todo_scroll = scroll_to_show(app.todo_scroll, row, rows, height);
    }
    let paragraph = Paragraph::new(list.lines)
        .style(app.theme.base())
        .scroll((app.todo_scroll as u16, 0));
    frame.render_widget(paragraph, list_area);

    if let Some((row, col)) = list.cursor
        && row >= app.todo_scroll
        && row < app.todo_scroll + height
    {
        let x = list_area.x + col.min(list_area.width as usize - 1) as u16;
        let y = list_area.y + (row - app.todo_scroll) as u16;
        frame.set_cursor_position(Position::new(x, y));
    }
}

fn render_add_prompt(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let label = format!("+ {}: ", app.add_prompt.target.label());
    let input = &app.add_prompt.input;
    let spans = vec![
        Span::styled(
            label,
            Style::default()
                .fg(app.theme.highlight)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            input.text().to_string(),
            Style::default().fg(app.theme.text_bright).bg(bg),
        ),
    ];
    let col =
        spans_width(&spans[..1]) + unicode::byte_offset_to_display_col(input.text(), input.cursor());
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
    let x = area.x + col.min(area.width.saturating_sub(1) as usize) as u16;
    frame.set_cursor_position(Position::new(x, area.y));
}

fn build_lines(app: &App, width: usize) -> ListLines {
    let mut out = ListLines {
        lines: Vec::new(),
        selected: None,
        cursor: None,
    };
    let body_width = width.saturating_sub(CHECKBOX_WIDTH).max(1);
    let focused = app.focus == Pane::Todo;

    for bucket in app.visible_buckets() {
        let start = out.lines.len();
        out.lines.push(header_line(app, bucket));
        if focused && app.todo_cursor == Some(TodoCursor::Header(bucket)) {
            out.selected = Some((start, 1));
        }
        if app.collapsed.contains(&bucket) {
            continue;
        }

        let items = app.collection.bucket(bucket);
        if items.is_empty() {
            out.lines.push(Line::from(Span::styled(
                "    (empty)",
                app.theme.dimmed(),
            )));
        }
        for item in items {
            let start = out.lines.len();
            match &app.edit {
                Some(edit) if edit.id == item.id => {
                    edit_lines(app, edit, item, body_width, &mut out);
                }
                _ => item_lines(app, item, body_width, &mut out.lines),
            }
            if focused && app.todo_cursor == Some(TodoCursor::Item(item.id)) {
                out.selected = Some((start, out.lines.len() - start));
            }
        }
    }
    out
}

fn header_line(app: &App, bucket: Bucket) -> Line<'static> {
    let marker = if app.collapsed.contains(&bucket) {
        "\u{25B8}"
    } else {
        "\u{25BE}"
    };
    let count = app.collection.bucket(bucket).len();
    let mut style = Style::default()
        .fg(app.theme.cyan)
        .bg(app.theme.background)
        .add_modifier(Modifier::BOLD);
    if app.focus == Pane::Todo && app.todo_cursor == Some(TodoCursor::Header(bucket)) {
        style = style.bg(app.theme.selection_bg);
    }
    Line::from(Span::styled(
        format!("{marker} {} ({count})", bucket.label()),
        style,
    ))
}

fn item_lines(app: &App, item: &TodoItem, body_width: usize, lines: &mut Vec<Line<'static>>) {
    let moving = app.move_state.is_some_and(|ms| ms.id == item.id);
    let selected = app.focus == Pane::Todo && app.todo_cursor == Some(TodoCursor::Item(item.id));

    let mut style = if item.done {
        app.theme.done_item()
    } else {
        app.theme.base()
    };
    if moving {
        style = style.fg(app.theme.highlight).add_modifier(Modifier::BOLD);
    }
    if selected {
        style = style.bg(app.theme.selection_bg);
    }
    // The checkbox itself is never struck through
    let box_style = style.remove_modifier(Modifier::CROSSED_OUT);
    let checkbox = match (moving, item.done) {
        (true, _) => "[\u{2261}] ",
        (false, true) => "[x] ",
        (false, false) => "[ ] ",
    };

    let mut first = true;
    for line in item.text.split('\n') {
        for chunk in unicode::wrap_to_width(&unicode::expand_tabs(line), body_width) {
            let lead = if first { checkbox } else { "    " };
            first = false;
            lines.push(Line::from(vec![
                Span::styled(lead, box_style),
                Span::styled(chunk, style),
            ]));
        }
    }
}

fn edit_lines(
    app: &App,
    edit: &InlineEdit,
    item: &TodoItem,
    body_width: usize,
    out: &mut ListLines,
) {
    let style = Style::default()
        .fg(app.theme.text_bright)
        .bg(app.theme.selection_bg);
    let start = out.lines.len();
    let wrapped = wrap_text(
        edit.buffer.text(),
        Some(edit.buffer.cursor()),
        body_width,
        |_| style,
        &[],
    );
    let rows = edit.rows(body_width);
    let checkbox = if item.done { "[x] " } else { "[ ] " };
    let pad = " ".repeat(body_width);

    let mut body = wrapped.lines.into_iter();
    for row in 0..rows {
        let lead = if row == 0 { checkbox } else { "    " };
        let mut spans = vec![Span::styled(lead, style)];
        match body.next() {
            Some(line) => {
                let used = spans_width(&line.spans);
                spans.extend(line.spans);
                spans.push(Span::styled(
                    " ".repeat(body_width.saturating_sub(used)),
                    style,
                ));
            }
            None => spans.push(Span::styled(pad.clone(), style)),
        }
        out.lines.push(Line::from(spans));
    }
    if let Some((row, col)) = wrapped.cursor {
        out.cursor = Some((start + row, CHECKBOX_WIDTH + col));
    }
}
