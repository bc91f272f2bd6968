//! Gemini single-prompt translation backend using the Generative AI API.

use crate::error::{Result, SubtransError};
use crate::translate::sanitize::strip_code_fences;
use crate::translate::{translation_instruction, Translator};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";

pub struct GeminiTranslator {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiTranslator {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Set a different model (e.g. "gemini-1.5-pro").
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Point the adapter at a different API base URL. Used by tests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Single prompt with the instruction and payload in one text block.
    fn build_prompt(&self, text: &str, target_language: &str) -> String {
        format!("{}\n\n{}", translation_instruction(target_language), text)
    }
}

#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Deserialize, Debug)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
    error: Option<GeminiError>,
}

#[derive(Deserialize, Debug)]
struct GeminiCandidate {
    content: Option<GeminiResponseContent>,
}

#[derive(Deserialize, Debug)]
struct GeminiResponseContent {
    parts: Option<Vec<GeminiResponsePart>>,
}

#[derive(Deserialize, Debug)]
struct GeminiResponsePart {
    text: Option<String>,
}

#[derive(Deserialize, Debug)]
struct GeminiError {
    message: String,
}

#[async_trait]
impl Translator for GeminiTranslator {
    async fn translate(&self, text: &str, target_language: &str) -> Result<String> {
        debug!("Translating {} chars to {} with Gemini", text.len(), target_language);

        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: self.build_prompt(text, target_language),
                }],
            }],
        };

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| SubtransError::Api(format!("Gemini request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SubtransError::Api(format!("Failed to read Gemini response: {e}")))?;

        if !status.is_success() {
            return Err(SubtransError::Api(format!(
                "Gemini API error ({status}): {body}"
            )));
        }

        let parsed: GeminiResponse = serde_json::from_str(&body)
            .map_err(|e| SubtransError::Api(format!("Failed to parse Gemini response: {e}")))?;

        if let Some(error) = parsed.error {
            return Err(SubtransError::Api(format!("Gemini error: {}", error.message)));
        }

        let translated = parsed
            .candidates
            .and_then(|c| c.into_iter().next())
            .and_then(|c| c.content)
            .and_then(|c| c.parts)
            .and_then(|p| p.into_iter().next())
            .and_then(|p| p.text)
            .ok_or_else(|| SubtransError::Api("Gemini response contained no text".to_string()))?;

        Ok(strip_code_fences(&translated))
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}
