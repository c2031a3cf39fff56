use std::ops::Range;

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Cells a tab occupies when drawn
pub const TAB_WIDTH: usize = 4;

/// Display width in terminal cells, tabs counting as [`TAB_WIDTH`].
pub fn display_width(s: &str) -> usize {
    s.graphemes(true).map(grapheme_width).sum()
}

fn grapheme_width(g: &str) -> usize {
    if g == "\t" {
        TAB_WIDTH
    } else {
        UnicodeWidthStr::width(g)
    }
}

/// Replace tabs with spaces so a line can be drawn cell-for-cell
pub fn expand_tabs(s: &str) -> String {
    s.replace('\t', &" ".repeat(TAB_WIDTH))
}

/// Cut `s` down to `max_cells`, ending in `…` when anything was dropped.
pub fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if display_width(s) <= max_cells {
        return s.to_string();
    }
    if max_cells == 0 {
        return String::new();
    }
    let budget = max_cells - 1;
    let mut used = 0;
    let mut out = String::new();
    for g in s.graphemes(true) {
        let w = grapheme_width(g);
        if used + w > budget {
            break;
        }
        used += w;
        out.push_str(g);
    }
    out.push('\u{2026}');
    out
}

/// Byte offset of the grapheme after the one at `offset`, or None at the end.
pub fn next_grapheme_boundary(s: &str, offset: usize) -> Option<usize> {
    if offset >= s.len() {
        return None;
    }
    let step = s[offset..]
        .graphemes(true)
        .next()
        .map_or(s.len() - offset, str::len);
    Some(offset + step)
}

/// Byte offset of the grapheme before `offset`, or None at the start.
pub fn prev_grapheme_boundary(s: &str, offset: usize) -> Option<usize> {
    if offset == 0 {
        return None;
    }
    s[..offset]
        .grapheme_indices(true)
        .next_back()
        .map(|(i, _)| i)
}

/// Column (in cells) at which byte `offset` is drawn
pub fn byte_offset_to_display_col(s: &str, offset: usize) -> usize {
    display_width(&s[..offset.min(s.len())])
}

/// Byte offset for a target column, snapping left inside wide graphemes
/// and to `s.len()` past the end.
pub fn display_col_to_byte_offset(s: &str, col: usize) -> usize {
    let mut used = 0;
    for (i, g) in s.grapheme_indices(true) {
        let w = grapheme_width(g);
        if used + w > col {
            return i;
        }
        used += w;
    }
    s.len()
}

fn is_blank(g: &str) -> bool {
    g.chars().all(char::is_whitespace)
}

/// Start of the word left of `offset` (whitespace-delimited)
pub fn word_boundary_left(s: &str, offset: usize) -> usize {
    let graphemes: Vec<(usize, &str)> = s[..offset.min(s.len())].grapheme_indices(true).collect();
    let mut idx = graphemes.len();
    while idx > 0 && is_blank(graphemes[idx - 1].1) {
        idx -= 1;
    }
    while idx > 0 && !is_blank(graphemes[idx - 1].1) {
        idx -= 1;
    }
    graphemes.get(idx).map_or(0, |(i, _)| *i)
}

/// Start of the next word right of `offset`, or the end of `s`
pub fn word_boundary_right(s: &str, offset: usize) -> usize {
    let mut iter = s[offset.min(s.len())..]
        .grapheme_indices(true)
        .skip_while(|(_, g)| !is_blank(g))
        .skip_while(|(_, g)| is_blank(g));
    iter.next().map_or(s.len(), |(i, _)| offset + i)
}

/// Hard-wrap a single line into chunks of at most `width` cells.
///
/// Breaks at the last space that fits when there is one, otherwise mid-word.
/// An empty line yields one empty chunk.
pub fn wrap_to_width(line: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut used = 0;
    let mut last_space: Option<usize> = None;

    for g in line.graphemes(true) {
        let w = grapheme_width(g);
        if used + w > width && !current.is_empty() {
            match last_space {
                Some(split) if split > 0 => {
                    let rest = current.split_off(split);
                    chunks.push(current.trim_end().to_string());
                    current = rest.trim_start().to_string();
                }
                _ => chunks.push(std::mem::take(&mut current)),
            }
            used = display_width(&current);
            last_space = None;
            if current.is_empty() && is_blank(g) {
                continue;
            }
        }
        if is_blank(g) {
            last_space = Some(current.len() + g.len());
        }
        current.push_str(g);
        used += w;
    }
    chunks.push(current);
    chunks
}

/// Soft-wrap `line` into contiguous byte ranges that together cover it.
///
/// Breaks after the last blank that fits; blanks at a break stay on the
/// earlier row and may overhang `width`. Words wider than `width` are split.
/// Always returns at least one range.
pub fn wrap_ranges(line: &str, width: usize) -> Vec<Range<usize>> {
    let width = width.max(1);
    let mut ranges = Vec::new();
    let mut start = 0;
    let mut used = 0;
    let mut last_space: Option<usize> = None;

    for (offset, g) in line.grapheme_indices(true) {
        let w = grapheme_width(g);
        if is_blank(g) {
            last_space = Some(offset + g.len());
            used += w;
            continue;
        }
        if used + w > width && offset > start {
            let split = match last_space {
                Some(s) if s > start => s,
                _ => offset,
            };
            ranges.push(start..split);
            start = split;
            used = display_width(&line[start..offset]);
            last_space = None;
        }
        used += w;
    }
    ranges.push(start..line.len());
    ranges
}
