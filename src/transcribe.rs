//! Audio-to-subtitle transcription using the Gemini Generative AI API.
//!
//! The audio artifact goes up inline (base64) with a prompt demanding
//! strictly formatted SRT output, which then flows into the normal
//! subtitle machinery.

use crate::error::{Result, SubtransError};
use crate::translate::sanitize::strip_code_fences;
use async_trait::async_trait;
use base64::Engine;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Transcription backend: audio artifact in, SRT subtitle text out.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio: &Path) -> Result<String>;
    fn name(&self) -> &'static str;
}

/// Inline data cap for the generateContent endpoint (20 MB).
const MAX_INLINE_SIZE: usize = 20 * 1024 * 1024;

/// Gemini audio transcription client producing SRT text.
pub struct GeminiTranscriber {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiTranscriber {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Set a different model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Point the client at a different API base URL. Used by tests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// MIME type for the audio artifact.
    fn get_mime_type(path: &Path) -> &'static str {
        match path.extension().and_then(|e| e.to_str()) {
            Some("mp3") => "audio/mpeg",
            Some("wav") => "audio/wav",
            Some("m4a") => "audio/mp4",
            Some("flac") => "audio/flac",
            Some("ogg") => "audio/ogg",
            Some("aac") => "audio/aac",
            _ => "audio/mpeg",
        }
    }

    /// Prompt demanding strict SRT with no commentary.
    fn build_prompt(&self) -> String {
        let mut prompt = String::new();
        prompt.push_str("Transcribe this audio into SRT subtitles.\n\n");
        prompt.push_str("Strict format requirements:\n");
        prompt.push_str("- Sequential subtitle numbers starting at 1\n");
        prompt.push_str("- Timecodes as HH:MM:SS,mmm --> HH:MM:SS,mmm\n");
        prompt.push_str("- At most 2 lines per caption, around 7 words per line\n");
        prompt.push_str("- A blank line between captions\n");
        prompt.push_str("- No commentary, headers or anything besides the subtitles\n");
        prompt
    }
}

#[async_trait]
impl Transcriber for GeminiTranscriber {
    async fn transcribe(&self, audio_path: &Path) -> Result<String> {
        debug!("Transcribing {} with Gemini", audio_path.display());

        let metadata = fs::metadata(audio_path).await?;
        let file_size = metadata.len() as usize;
        if file_size > MAX_INLINE_SIZE {
            return Err(SubtransError::Transcription(format!(
                "Audio file too large for inline upload: {} bytes (max {} bytes)",
                file_size, MAX_INLINE_SIZE
            )));
        }

        let audio_bytes = fs::read(audio_path).await?;
        let base64_audio = base64::engine::general_purpose::STANDARD.encode(&audio_bytes);

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text {
                        text: self.build_prompt(),
                    },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: Self::get_mime_type(audio_path).to_string(),
                            data: base64_audio,
                        },
                    },
                ],
            }],
            generation_config: Some(GenerationConfig {
                temperature: Some(0.0),
                max_output_tokens: Some(8192),
            }),
        };

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| SubtransError::Transcription(format!("Gemini request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SubtransError::Transcription(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(SubtransError::Transcription(format!(
                "Gemini API error ({status}): {body}"
            )));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| SubtransError::Transcription(format!("Failed to parse response: {e}")))?;

        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| match p {
                ResponsePart::Text { text } => text,
            })
            .ok_or_else(|| {
                SubtransError::Transcription("Gemini response contained no text".to_string())
            })?;

        let srt = strip_code_fences(&text);

        if !looks_like_srt(&srt) {
            warn!("Transcript does not look like SRT, passing it through anyway");
        }

        Ok(srt)
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

/// Cheap sanity check that the transcript contains SRT-style timecodes.
fn looks_like_srt(text: &str) -> bool {
    let timecode =
        Regex::new(r"\d{2}:\d{2}:\d{2},\d{3} --> \d{2}:\d{2}:\d{2},\d{3}").expect("valid regex");
    timecode.is_match(text)
}

// Request/response types shared with the inline-audio call shape.

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ResponsePart {
    Text { text: String },
}
