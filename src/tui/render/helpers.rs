use std::ops::Range;

use ratatui::style::Style;
use ratatui::text::{Line, Span};

use crate::util::unicode;

/// Soft-wrapped text ready for a `Paragraph`, plus the cursor cell
pub(super) struct Wrapped {
    pub lines: Vec<Line<'static>>,
    /// (row, column) of the cursor within `lines`
    pub cursor: Option<(usize, usize)>,
}

/// Wrap `text` to `width` cells. `line_style` picks the base style of each
/// logical line; `highlights` are absolute byte ranges (sorted, disjoint)
/// drawn with their own style on top.
pub(super) fn wrap_text(
    text: &str,
    cursor: Option<usize>,
    width: usize,
    line_style: impl Fn(&str) -> Style,
    highlights: &[(Range<usize>, Style)],
) -> Wrapped {
    let mut lines = Vec::new();
    let mut cursor_cell = None;
    let mut line_start = 0;

    for line in text.split('\n') {
        let base = line_style(line);
        let segments = unicode::wrap_ranges(line, width);
        let last = segments.len() - 1;
        for (i, seg) in segments.into_iter().enumerate() {
            let abs = line_start + seg.start..line_start + seg.end;
            if let Some(c) = cursor
                && c >= abs.start
                && (c < abs.end || (i == last && c == abs.end))
            {
                let col = unicode::display_width(&text[abs.start..c]);
                cursor_cell = Some((lines.len(), col));
            }
            lines.push(styled_segment(text, abs, base, highlights));
        }
        line_start += line.len() + 1;
    }

    Wrapped {
        lines,
        cursor: cursor_cell,
    }
}

fn styled_segment(
    text: &str,
    range: Range<usize>,
    base: Style,
    highlights: &[(Range<usize>, Style)],
) -> Line<'static> {
    let mut spans = Vec::new();
    let mut pos = range.start;
    for (hl, style) in highlights {
        let start = hl.start.max(pos);
        let end = hl.end.min(range.end);
        if start >= end {
            continue;
        }
        if start > pos {
            spans.push(Span::styled(unicode::expand_tabs(&text[pos..start]), base));
        }
        spans.push(Span::styled(
            unicode::expand_tabs(&text[start..end]),
            base.patch(*style),
        ));
        pos = end;
    }
    if pos < range.end {
        spans.push(Span::styled(unicode::expand_tabs(&text[pos..range.end]), base));
    }
    Line::from(spans)
}

/// First row to draw so that `row` stays inside a window of `height` rows
pub(super) fn scroll_to_show(scroll: usize, row: usize, rows_used: usize, height: usize) -> usize {
    let height = height.max(1);
    if row < scroll {
        row
    } else if row + rows_used > scroll + height {
        (row + rows_used).saturating_sub(height)
    } else {
        scroll
    }
}

/// Compute total display width of a slice of spans
pub(super) fn spans_width(spans: &[Span]) -> usize {
    spans
        .iter()
        .map(|s| unicode::display_width(&s.content))
        .sum()
}
