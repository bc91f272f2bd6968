//! Media-to-subtitle generation pipeline.
//!
//! Drives one media job through a fixed stage sequence: extract the audio
//! track, transcribe it into SRT text, then translate the transcript into
//! the requested language. Extraction and transcription failures are fatal;
//! a failed final translation degrades to the untranslated transcript.

use crate::audio::extract_audio;
use crate::error::{Result, SubtransError};
use crate::lang::language_name;
use crate::transcribe::{GeminiTranscriber, Transcriber};
use crate::translate::gemini::GeminiTranslator;
use crate::translate::Translator;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tempfile::TempDir;
use tracing::{debug, info, warn};

/// Named step in the generation pipeline's linear progress sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaStage {
    Preparing,
    ExtractingAudio,
    GeneratingSubtitles,
    TranslatingSubtitles,
    Complete,
    Error,
}

impl MediaStage {
    /// Progress value (0-100) reported at the transition into this stage.
    pub fn progress(&self) -> u8 {
        match self {
            MediaStage::Preparing => 0,
            MediaStage::ExtractingAudio => 10,
            MediaStage::GeneratingSubtitles => 40,
            MediaStage::TranslatingSubtitles => 75,
            MediaStage::Complete => 100,
            MediaStage::Error => 100,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MediaStage::Preparing => "preparing",
            MediaStage::ExtractingAudio => "extracting-audio",
            MediaStage::GeneratingSubtitles => "generating-subtitles",
            MediaStage::TranslatingSubtitles => "translating-subtitles",
            MediaStage::Complete => "complete",
            MediaStage::Error => "error",
        }
    }
}

impl std::fmt::Display for MediaStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Progress notification: `(progress 0-100, stage label)`.
pub type MediaProgressCallback = Box<dyn Fn(u8, &str) + Send + Sync>;

/// Result of one media job.
#[derive(Debug)]
pub struct MediaOutcome {
    /// Generated (and usually translated) subtitle text.
    pub text: String,
    /// Non-fatal warning, set when the final translation step failed and
    /// the untranslated transcript was returned instead.
    pub warning: Option<String>,
}

/// One-shot pipeline from a video file to subtitle text.
pub struct MediaPipeline {
    transcriber: Box<dyn Transcriber>,
    translator: Box<dyn Translator>,
    cancelled: Arc<AtomicBool>,
    progress: Option<MediaProgressCallback>,
}

impl MediaPipeline {
    /// Build the default pipeline: Gemini transcription plus the
    /// single-prompt Gemini translation shape, sharing one credential.
    pub fn new(gemini_api_key: String) -> Self {
        Self {
            transcriber: Box::new(GeminiTranscriber::new(gemini_api_key.clone())),
            translator: Box::new(GeminiTranslator::new(gemini_api_key)),
            cancelled: Arc::new(AtomicBool::new(false)),
            progress: None,
        }
    }

    /// Swap in a different transcription backend.
    pub fn with_transcriber(mut self, transcriber: Box<dyn Transcriber>) -> Self {
        self.transcriber = transcriber;
        self
    }

    /// Swap in a different translation backend for the final stage.
    pub fn with_translator(mut self, translator: Box<dyn Translator>) -> Self {
        self.translator = translator;
        self
    }

    /// Share a cancellation flag; the job stops between stages when set.
    pub fn with_cancel_flag(mut self, cancelled: Arc<AtomicBool>) -> Self {
        self.cancelled = cancelled;
        self
    }

    /// Register a progress callback invoked at every stage transition.
    pub fn with_progress(mut self, callback: MediaProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    fn emit(&self, stage: MediaStage) {
        debug!("Stage: {} ({}%)", stage.label(), stage.progress());
        if let Some(ref progress) = self.progress {
            progress(stage.progress(), stage.label());
        }
    }

    fn check_cancelled(&self) -> Result<()> {
        if self.cancelled.load(Ordering::Relaxed) {
            return Err(SubtransError::Cancelled);
        }
        Ok(())
    }

    /// Run the full pipeline on a video file.
    pub async fn generate(&self, input: &Path, target_lang: &str) -> Result<MediaOutcome> {
        match self.run(input, target_lang).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                self.emit(MediaStage::Error);
                Err(e)
            }
        }
    }

    async fn run(&self, input: &Path, target_lang: &str) -> Result<MediaOutcome> {
        self.emit(MediaStage::Preparing);

        if !input.exists() {
            return Err(SubtransError::FileNotFound(input.display().to_string()));
        }
        self.check_cancelled()?;

        // Temp dir owns the audio artifact; dropped when the job ends
        let temp_dir = TempDir::new()?;
        let audio_path = temp_dir.path().join("audio.mp3");

        self.emit(MediaStage::ExtractingAudio);
        let metadata = extract_audio(input, &audio_path).await?;
        info!(
            "Extracted {:.1}s of audio for transcription",
            metadata.duration.as_secs_f64()
        );

        self.generate_from_audio(&audio_path, target_lang).await
    }

    /// Stages after extraction: transcribe, then always translate.
    ///
    /// The transcript is routed through translation even when the requested
    /// language matches the spoken one; the same call doubles as formatting
    /// normalization. See DESIGN.md for the policy note.
    async fn generate_from_audio(&self, audio: &Path, target_lang: &str) -> Result<MediaOutcome> {
        self.check_cancelled()?;
        self.emit(MediaStage::GeneratingSubtitles);

        let transcript = self.transcriber.transcribe(audio).await?;
        debug!("Transcript: {} chars", transcript.len());

        self.check_cancelled()?;
        self.emit(MediaStage::TranslatingSubtitles);

        let target_name = language_name(target_lang);
        let (text, warning) = match self.translator.translate(&transcript, &target_name).await {
            Ok(translated) => (translated, None),
            Err(e) => {
                warn!("Post-transcription translation failed: {e}");
                (
                    transcript,
                    Some(format!(
                        "translation to {target_name} failed, returning untranslated subtitles: {e}"
                    )),
                )
            }
        };

        self.emit(MediaStage::Complete);
        Ok(MediaOutcome { text, warning })
    }
}
