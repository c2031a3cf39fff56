pub mod text_buffer;
pub mod unicode;

pub use text_buffer::TextBuffer;
