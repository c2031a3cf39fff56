use std::ops::Range;

use regex::{Regex, RegexBuilder};

use crate::util::TextBuffer;

/// Turn the cursor line into a heading of `level` (1-3), or a plain
/// paragraph with `None`. Existing `#` markers are replaced.
pub fn set_heading(buffer: &mut TextBuffer, level: Option<u8>) {
    let line = buffer.current_line_range();
    let text = &buffer.text()[line.clone()];
    let marker_len = heading_marker_len(text);
    let marker = match level {
        Some(n) => format!("{} ", "#".repeat(n.clamp(1, 6) as usize)),
        None => String::new(),
    };
    buffer.replace_range(line.start..line.start + marker_len, &marker);
}

/// Bytes of a leading `#{1,6} ` marker, 0 when the line is not a heading
fn heading_marker_len(line: &str) -> usize {
    let hashes = line.bytes().take_while(|b| *b == b'#').count();
    if (1..=6).contains(&hashes) && line[hashes..].starts_with(' ') {
        hashes + 1
    } else {
        0
    }
}

/// Heading level of a line, if it is one
pub fn heading_level(line: &str) -> Option<usize> {
    match heading_marker_len(line) {
        0 => None,
        n => Some(n - 1),
    }
}

/// Find-in-memo state: a case-insensitive literal query and its matches.
#[derive(Debug, Clone, Default)]
pub struct MemoSearch {
    pub query: TextBuffer,
    matches: Vec<Range<usize>>,
    /// Index into `matches` of the highlighted hit
    active: Option<usize>,
}

impl MemoSearch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Regex for the current query, None while the query is empty
    pub fn pattern(&self) -> Option<Regex> {
        let query = self.query.text();
        if query.is_empty() {
            return None;
        }
        RegexBuilder::new(&regex::escape(query))
            .case_insensitive(true)
            .build()
            .ok()
    }

    /// Recompute matches against `text` and highlight the first hit at or
    /// after `from`.
    pub fn refresh(&mut self, text: &str, from: usize) {
        self.matches = match self.pattern() {
            Some(re) => re.find_iter(text).map(|m| m.range()).collect(),
            None => Vec::new(),
        };
        self.active = if self.matches.is_empty() {
            None
        } else {
            Some(
                self.matches
                    .iter()
                    .position(|m| m.start >= from)
                    .unwrap_or(0),
            )
        };
    }

    /// Step to the next (or previous) hit, wrapping around
    pub fn step(&mut self, forward: bool) -> Option<Range<usize>> {
        let count = self.matches.len();
        if count == 0 {
            return None;
        }
        let next = match (self.active, forward) {
            (None, true) => 0,
            (None, false) => count - 1,
            (Some(i), true) => (i + 1) % count,
            (Some(i), false) => (i + count - 1) % count,
        };
        self.active = Some(next);
        self.active_match()
    }

    pub fn active_match(&self) -> Option<Range<usize>> {
        self.active.and_then(|i| self.matches.get(i).cloned())
    }

    pub fn matches(&self) -> &[Range<usize>] {
        &self.matches
    }

    /// `k / n` for the highlighted hit, `0 / 0` when nothing matches
    pub fn counter(&self) -> String {
        match self.active {
            Some(i) => format!("{} / {}", i + 1, self.matches.len()),
            None => "0 / 0".to_string(),
        }
    }
}
