//! Drives one translation job: parse, chunk, sequential backend calls,
//! timing restoration and partial-failure recovery.

use crate::error::{Result, SubtransError};
use crate::lang::language_name;
use crate::subtitle::{chunk_blocks, parse, serialize, SubtitleBlock, DEFAULT_MAX_BLOCKS_PER_CHUNK};
use crate::translate::Translator;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Pause between consecutive backend calls to stay under rate limits.
const CHUNK_DELAY: Duration = Duration::from_secs(1);

/// Progress notification: `(completed_chunks, total_chunks)`.
pub type ProgressCallback = Box<dyn Fn(usize, usize) + Send + Sync>;

/// Terminal status of a translation job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslationStatus {
    Succeeded,
    SucceededWithWarnings,
}

/// Transient per-invocation accumulator state. Created when a job starts,
/// consumed into a [`TranslationOutcome`] when it ends; never persisted.
#[derive(Debug)]
struct TranslationJob {
    completed_chunks: usize,
    total_chunks: usize,
    failed_chunks: Vec<usize>,
    blocks: Vec<SubtitleBlock>,
}

impl TranslationJob {
    fn new(total_chunks: usize) -> Self {
        Self {
            completed_chunks: 0,
            total_chunks,
            failed_chunks: Vec::new(),
            blocks: Vec::new(),
        }
    }

    fn finish(self) -> TranslationOutcome {
        TranslationOutcome {
            text: serialize(&self.blocks),
            failed_chunks: self.failed_chunks,
        }
    }
}

/// Result of one translation job. The full text is always present; chunk
/// failures degrade to untranslated content instead of aborting.
#[derive(Debug)]
pub struct TranslationOutcome {
    /// Serialized subtitle text, merged from all chunks.
    pub text: String,
    /// 1-based ordinals of chunks whose backend call failed.
    pub failed_chunks: Vec<usize>,
}

impl TranslationOutcome {
    pub fn status(&self) -> TranslationStatus {
        if self.failed_chunks.is_empty() {
            TranslationStatus::Succeeded
        } else {
            TranslationStatus::SucceededWithWarnings
        }
    }

    /// Aggregate warning naming the failed chunks, if any failed.
    pub fn warning(&self) -> Option<String> {
        if self.failed_chunks.is_empty() {
            return None;
        }
        let ordinals: Vec<String> = self.failed_chunks.iter().map(|c| c.to_string()).collect();
        Some(format!(
            "completed with errors in chunks: {}",
            ordinals.join(", ")
        ))
    }
}

/// Orchestrates sequential chunk-by-chunk translation of a subtitle
/// document.
///
/// Chunks are processed strictly one at a time. That bounds memory, keeps
/// output ordering trivial and respects backend rate limits; no two backend
/// calls ever overlap within one job.
pub struct TranslationOrchestrator {
    translator: Arc<dyn Translator>,
    max_blocks_per_chunk: usize,
    chunk_delay: Duration,
    cancelled: Arc<AtomicBool>,
    progress: Option<ProgressCallback>,
}

impl TranslationOrchestrator {
    pub fn new(translator: Box<dyn Translator>) -> Self {
        Self {
            translator: Arc::from(translator),
            max_blocks_per_chunk: DEFAULT_MAX_BLOCKS_PER_CHUNK,
            chunk_delay: CHUNK_DELAY,
            cancelled: Arc::new(AtomicBool::new(false)),
            progress: None,
        }
    }

    /// Override the blocks-per-chunk bound.
    pub fn with_max_blocks_per_chunk(mut self, max_blocks: usize) -> Self {
        self.max_blocks_per_chunk = max_blocks;
        self
    }

    /// Override the inter-chunk pacing delay. Tests pass `Duration::ZERO`.
    pub fn with_chunk_delay(mut self, delay: Duration) -> Self {
        self.chunk_delay = delay;
        self
    }

    /// Share a cancellation flag; the job stops between chunks when set.
    pub fn with_cancel_flag(mut self, cancelled: Arc<AtomicBool>) -> Self {
        self.cancelled = cancelled;
        self
    }

    /// Register a progress callback invoked after every chunk.
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    /// Translate a whole subtitle document into the language identified by
    /// `target_lang` (a code from the catalog; unknown codes pass through
    /// verbatim into the prompt).
    pub async fn translate_document(
        &self,
        text: &str,
        target_lang: &str,
    ) -> Result<TranslationOutcome> {
        let blocks = parse(text);
        if blocks.is_empty() {
            debug!("Input parsed to zero blocks, nothing to translate");
            return Ok(TranslationOutcome {
                text: String::new(),
                failed_chunks: Vec::new(),
            });
        }

        let chunks = chunk_blocks(blocks, self.max_blocks_per_chunk);
        let total_chunks = chunks.len();
        let target_name = language_name(target_lang);

        info!(
            "Translating {} chunk(s) to {} with {}",
            total_chunks,
            target_name,
            self.translator.name()
        );

        let mut job = TranslationJob::new(total_chunks);

        for (chunk_idx, chunk) in chunks.into_iter().enumerate() {
            if self.cancelled.load(Ordering::Relaxed) {
                return Err(SubtransError::Cancelled);
            }

            let ordinal = chunk_idx + 1;
            self.process_chunk(&mut job, ordinal, chunk, &target_name).await;

            if let Some(ref progress) = self.progress {
                progress(job.completed_chunks, job.total_chunks);
            }

            if ordinal < total_chunks && !self.chunk_delay.is_zero() {
                tokio::time::sleep(self.chunk_delay).await;
            }
        }

        if job.failed_chunks.is_empty() {
            info!("Translation complete: {} chunk(s)", total_chunks);
        } else {
            warn!(
                "Translation completed with {} failed chunk(s): {:?}",
                job.failed_chunks.len(),
                job.failed_chunks
            );
        }

        Ok(job.finish())
    }

    /// One backend call for one chunk, accumulating into the job state.
    async fn process_chunk(
        &self,
        job: &mut TranslationJob,
        ordinal: usize,
        chunk: Vec<SubtitleBlock>,
        target_name: &str,
    ) {
        let chunk_text = serialize(&chunk);
        debug!(
            "Translating chunk {}/{} ({} blocks, {} chars)",
            ordinal,
            job.total_chunks,
            chunk.len(),
            chunk_text.len()
        );

        match self.translator.translate(&chunk_text, target_name).await {
            Ok(translated_text) => {
                let translated = parse(&translated_text);
                job.blocks.extend(restore_metadata(&chunk, translated));
            }
            Err(e) => {
                // Graceful degradation: keep the original blocks so no
                // content is ever dropped.
                warn!("Chunk {}/{} failed: {}", ordinal, job.total_chunks, e);
                job.failed_chunks.push(ordinal);
                job.blocks.extend(chunk);
            }
        }

        job.completed_chunks = ordinal;
    }
}

/// Restore each translated block's index and timing from the original
/// block at the same position.
///
/// Backends are untrusted to preserve these fields exactly, so whatever
/// they returned there is discarded. When the backend returns fewer blocks
/// than it was sent, the missing tail is filled with the original
/// untranslated blocks; extra trailing blocks are dropped.
fn restore_metadata(
    originals: &[SubtitleBlock],
    mut translated: Vec<SubtitleBlock>,
) -> Vec<SubtitleBlock> {
    if translated.len() != originals.len() {
        warn!(
            "Backend returned {} blocks for a {}-block chunk",
            translated.len(),
            originals.len()
        );
    }
    translated.truncate(originals.len());

    originals
        .iter()
        .enumerate()
        .map(|(i, original)| match translated.get_mut(i) {
            Some(block) => SubtitleBlock {
                index: original.index,
                timing: original.timing.clone(),
                content: std::mem::take(&mut block.content),
            },
            None => original.clone(),
        })
        .collect()
}
