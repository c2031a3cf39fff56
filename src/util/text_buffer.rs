use std::ops::Range;

use super::unicode;

/// A multi-line text buffer with a byte-offset cursor.
///
/// Used for the memo editor, the inline to-do edit field and the prompts.
/// The cursor always sits on a grapheme boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    text: String,
    cursor: usize,
    /// Column to aim for when moving vertically through shorter lines
    sticky_col: Option<usize>,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer holding `text` with the cursor at the end
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.len();
        TextBuffer {
            text,
            cursor,
            sticky_col: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Replace the whole content, cursor to the end
    pub fn set_text(&mut self, text: impl Into<String>) {
        *self = Self::from_text(text);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Place the cursor, snapping back to a char boundary
    pub fn set_cursor(&mut self, offset: usize) {
        let mut offset = offset.min(self.text.len());
        while !self.text.is_char_boundary(offset) {
            offset -= 1;
        }
        self.cursor = offset;
        self.sticky_col = None;
    }

    // -- editing ---------------------------------------------------------

    pub fn insert_char(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
        self.sticky_col = None;
    }

    pub fn insert_str(&mut self, s: &str) {
        self.text.insert_str(self.cursor, s);
        self.cursor += s.len();
        self.sticky_col = None;
    }

    pub fn newline(&mut self) {
        self.insert_char('\n');
    }

    /// Delete the grapheme before the cursor. Returns whether anything changed.
    pub fn backspace(&mut self) -> bool {
        match unicode::prev_grapheme_boundary(&self.text, self.cursor) {
            Some(start) => {
                self.text.replace_range(start..self.cursor, "");
                self.cursor = start;
                self.sticky_col = None;
                true
            }
            None => false,
        }
    }

    /// Delete the grapheme under the cursor. Returns whether anything changed.
    pub fn delete(&mut self) -> bool {
        match unicode::next_grapheme_boundary(&self.text, self.cursor) {
            Some(end) => {
                self.text.replace_range(self.cursor..end, "");
                self.sticky_col = None;
                true
            }
            None => false,
        }
    }

    /// Replace a byte range, keeping the cursor on the same text where possible
    pub fn replace_range(&mut self, range: Range<usize>, with: &str) {
        let removed = range.end - range.start;
        let cursor = if self.cursor >= range.end {
            self.cursor - removed + with.len()
        } else if self.cursor > range.start {
            range.start + with.len()
        } else {
            self.cursor
        };
        self.text.replace_range(range, with);
        self.set_cursor(cursor);
    }

    // -- motion ----------------------------------------------------------

    pub fn move_left(&mut self) {
        if let Some(pos) = unicode::prev_grapheme_boundary(&self.text, self.cursor) {
            self.cursor = pos;
        }
        self.sticky_col = None;
    }

    pub fn move_right(&mut self) {
        if let Some(pos) = unicode::next_grapheme_boundary(&self.text, self.cursor) {
            self.cursor = pos;
        }
        self.sticky_col = None;
    }

    pub fn word_left(&mut self) {
        self.cursor = unicode::word_boundary_left(&self.text, self.cursor);
        self.sticky_col = None;
    }

    pub fn word_right(&mut self) {
        self.cursor = unicode::word_boundary_right(&self.text, self.cursor);
        self.sticky_col = None;
    }

    pub fn line_start(&mut self) {
        self.cursor = self.current_line_range().start;
        self.sticky_col = None;
    }

    pub fn line_end(&mut self) {
        self.cursor = self.current_line_range().end;
        self.sticky_col = None;
    }

    pub fn buffer_start(&mut self) {
        self.set_cursor(0);
    }

    pub fn buffer_end(&mut self) {
        self.set_cursor(self.text.len());
    }

    pub fn move_up(&mut self) {
        self.move_lines(-1);
    }

    pub fn move_down(&mut self) {
        self.move_lines(1);
    }

    /// Move by `delta` lines, keeping the sticky column
    pub fn move_lines(&mut self, delta: isize) {
        let (line, col) = self.cursor_line_col();
        let goal = *self.sticky_col.get_or_insert(col);
        let last = self.line_count() - 1;
        let target = line as isize + delta;
        if target < 0 {
            self.cursor = 0;
            return;
        }
        if target as usize > last {
            self.cursor = self.text.len();
            return;
        }
        let range = self.line_range(target as usize);
        let line_text = &self.text[range.clone()];
        self.cursor = range.start + unicode::display_col_to_byte_offset(line_text, goal);
    }

    // -- geometry --------------------------------------------------------

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.split('\n')
    }

    pub fn line_count(&self) -> usize {
        self.text.matches('\n').count() + 1
    }

    /// Byte range of line `n` (without its newline). Out of range lines
    /// clamp to the last one.
    pub fn line_range(&self, n: usize) -> Range<usize> {
        let mut start = 0;
        for (i, line) in self.text.split('\n').enumerate() {
            let end = start + line.len();
            if i == n || end == self.text.len() {
                return start..end;
            }
            start = end + 1;
        }
        start..self.text.len()
    }

    /// Byte range of the line holding the cursor
    pub fn current_line_range(&self) -> Range<usize> {
        let start = self.text[..self.cursor].rfind('\n').map_or(0, |i| i + 1);
        let end = self.text[self.cursor..]
            .find('\n')
            .map_or(self.text.len(), |i| self.cursor + i);
        start..end
    }

    /// Zero-based line and display column of the cursor
    pub fn cursor_line_col(&self) -> (usize, usize) {
        let before = &self.text[..self.cursor];
        let line = before.matches('\n').count();
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let col = unicode::display_width(&self.text[line_start..self.cursor]);
        (line, col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_and_backspace() {
        let mut buf = TextBuffer::new();
        for c in "milk".chars() {
            buf.insert_char(c);
        }
        assert_eq!(buf.text(), "milk");
        assert!(buf.backspace());
        assert_eq!(buf.text(), "mil");
        buf.buffer_start();
        assert!(!buf.backspace());
        assert!(buf.delete());
        assert_eq!(buf.text(), "il");
    }

    #[test]
    fn backspace_removes_whole_grapheme() {
        let mut buf = TextBuffer::from_text("ok 👍🏽");
        assert!(buf.backspace());
        assert_eq!(buf.text(), "ok ");
    }

    #[test]
    fn newline_and_line_geometry() {
        let mut buf = TextBuffer::from_text("first");
        buf.newline();
        buf.insert_str("second");
        assert_eq!(buf.line_count(), 2);
        assert_eq!(buf.cursor_line_col(), (1, 6));
        assert_eq!(buf.current_line_range(), 6..12);
        assert_eq!(buf.line_range(0), 0..5);
        assert_eq!(buf.line_range(7), 6..12);
    }

    #[test]
    fn vertical_motion_keeps_column() {
        let mut buf = TextBuffer::from_text("long line\nab\nanother line");
        buf.set_cursor(7);
        buf.move_down();
        assert_eq!(buf.cursor_line_col(), (1, 2));
        buf.move_down();
        assert_eq!(buf.cursor_line_col(), (2, 7));
        buf.move_down();
        assert_eq!(buf.cursor(), buf.text().len());
        buf.set_cursor(3);
        buf.move_up();
        assert_eq!(buf.cursor(), 0);
    }

    #[test]
    fn line_start_and_end() {
        let mut buf = TextBuffer::from_text("a\nbcd\ne");
        buf.set_cursor(3);
        buf.line_start();
        assert_eq!(buf.cursor(), 2);
        buf.line_end();
        assert_eq!(buf.cursor(), 5);
    }

    #[test]
    fn replace_range_shifts_cursor() {
        let mut buf = TextBuffer::from_text("# Title");
        buf.replace_range(0..2, "### ");
        assert_eq!(buf.text(), "### Title");
        assert_eq!(buf.cursor(), buf.text().len());

        let mut buf = TextBuffer::from_text("## x");
        buf.set_cursor(1);
        buf.replace_range(0..3, "");
        assert_eq!(buf.text(), "x");
        assert_eq!(buf.cursor(), 0);
    }

    #[test]
    fn set_cursor_snaps_to_char_boundary() {
        let mut buf = TextBuffer::from_text("할");
        buf.set_cursor(2);
        assert_eq!(buf.cursor(), 0);
    }
}
