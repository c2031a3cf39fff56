use std::path::PathBuf;

use crate::util::TextBuffer;

/// The memo pad: markdown source plus the file it was last opened from or
/// saved to.
#[derive(Debug, Clone, Default)]
pub struct Memo {
    pub buffer: TextBuffer,
    pub path: Option<PathBuf>,
}

impl Memo {
    pub fn new(text: impl Into<String>) -> Self {
        let mut buffer = TextBuffer::from_text(text);
        buffer.buffer_start();
        Memo { buffer, path: None }
    }

    pub fn text(&self) -> &str {
        self.buffer.text()
    }

    /// Replace the content, e.g. after opening a file. The cursor goes to the top.
    pub fn replace(&mut self, text: impl Into<String>, path: Option<PathBuf>) {
        *self = Memo::new(text);
        self.path = path;
    }

    /// File name shown in the pane title
    pub fn title(&self) -> String {
        self.path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "untitled".to_string())
    }
}
