//! SRT parsing and serialization.
//!
//! The parser is deliberately lenient: it never fails on malformed input.
//! Blocks that cannot be fully understood still come back as blocks, worst
//! case with an empty content list, so a translation job can always proceed
//! with whatever structure was recoverable.

use super::SubtitleBlock;

/// Parse raw SRT text into an ordered sequence of subtitle blocks.
///
/// Line endings (`\r\n`, bare `\r`) are normalized to `\n` first. Candidate
/// blocks are separated by blank lines; candidates that are empty after
/// trimming are discarded. Within a block the first line is the index
/// (falling back to the 1-based position when unparsable), the second line
/// is kept verbatim as the timing line, and everything after that is
/// caption content.
pub fn parse(text: &str) -> Vec<SubtitleBlock> {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");

    normalized
        .split("\n\n")
        .filter(|candidate| !candidate.trim().is_empty())
        .enumerate()
        .map(|(position, candidate)| {
            let mut lines = candidate.trim().lines();

            let index_line = lines.next().unwrap_or("");
            let index = index_line
                .trim()
                .parse::<usize>()
                .unwrap_or(position + 1);

            let timing = lines.next().unwrap_or("").to_string();
            let content: Vec<String> = lines.map(|l| l.to_string()).collect();

            SubtitleBlock {
                index,
                timing,
                content,
            }
        })
        .collect()
}

/// Serialize subtitle blocks back to SRT text.
///
/// Structural inverse of [`parse`] for well-formed input: each block is
/// `index\ntiming\ncontent` and blocks are joined by a blank line.
pub fn serialize(blocks: &[SubtitleBlock]) -> String {
    blocks
        .iter()
        .map(|block| format!("{}\n{}\n{}", block.index, block.timing, block.content.join("\n")))
        .collect::<Vec<_>>()
        .join("\n\n")
}
