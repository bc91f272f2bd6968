//! Partitions a subtitle document into batches small enough for a single
//! backend call.

use super::SubtitleBlock;

/// Default maximum number of blocks per chunk.
pub const DEFAULT_MAX_BLOCKS_PER_CHUNK: usize = 100;

/// Cumulative character ceiling for one chunk, measured over caption
/// content only (indices and timing lines are cheap and excluded).
pub const MAX_CHUNK_CHARS: usize = 4000;

/// Split blocks into contiguous chunks of at most `max_blocks` blocks and
/// at most [`MAX_CHUNK_CHARS`] characters of content.
///
/// A chunk always receives at least one block: the ceiling only stops
/// further growth of a non-empty chunk, it never splits a single oversized
/// block. Concatenating the chunks reproduces the input order exactly.
pub fn chunk_blocks(blocks: Vec<SubtitleBlock>, max_blocks: usize) -> Vec<Vec<SubtitleBlock>> {
    let mut chunks: Vec<Vec<SubtitleBlock>> = Vec::new();
    let mut current: Vec<SubtitleBlock> = Vec::new();
    let mut current_chars = 0usize;

    for block in blocks {
        let block_chars = block.content_len();

        let over_blocks = current.len() >= max_blocks;
        let over_chars = !current.is_empty() && current_chars + block_chars > MAX_CHUNK_CHARS;

        if over_blocks || over_chars {
            chunks.push(std::mem::take(&mut current));
            current_chars = 0;
        }

        current_chars += block_chars;
        current.push(block);
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}
