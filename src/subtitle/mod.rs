pub mod chunk;
pub mod srt;

pub use chunk::{chunk_blocks, DEFAULT_MAX_BLOCKS_PER_CHUNK, MAX_CHUNK_CHARS};
pub use srt::{parse, serialize};

/// One caption unit as it appears in an SRT document.
///
/// `timing` is kept as the raw timecode line and is never inspected or
/// mutated by translation logic; it is carried through byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleBlock {
    /// Sequence number from the source, or a position-based fallback.
    pub index: usize,
    /// Raw start/end timecode line, e.g. `00:00:01,000 --> 00:00:02,000`.
    pub timing: String,
    /// One or more text lines making up the caption body.
    pub content: Vec<String>,
}

impl SubtitleBlock {
    /// Caption body size in characters, measured as the content lines
    /// joined by newline. Used by the chunker's size ceiling.
    pub fn content_len(&self) -> usize {
        if self.content.is_empty() {
            return 0;
        }
        let line_total: usize = self.content.iter().map(|l| l.chars().count()).sum();
        line_total + self.content.len() - 1
    }
}
