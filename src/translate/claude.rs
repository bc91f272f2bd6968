//! Claude translation backend using the Anthropic Messages API.

use crate::error::{Result, SubtransError};
use crate::translate::sanitize::strip_code_fences;
use crate::translate::{translation_instruction, Translator};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";
const DEFAULT_MODEL: &str = "claude-3-5-haiku-latest";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 8192;

pub struct ClaudeTranslator {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl ClaudeTranslator {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
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

    /// Point the adapter at a different API base URL. Used by tests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    system: String,
    messages: Vec<Message>,
}

#[derive(Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentSegment>,
}

/// Typed content segment; only `text` segments carry the translation.
#[derive(Deserialize)]
struct ContentSegment {
    #[serde(rename = "type")]
    segment_type: String,
    text: Option<String>,
}

#[async_trait]
impl Translator for ClaudeTranslator {
    async fn translate(&self, text: &str, target_language: &str) -> Result<String> {
        debug!("Translating {} chars to {} with Claude", text.len(), target_language);

        let request = MessagesRequest {
            model: self.model.clone(),
            max_tokens: MAX_TOKENS,
            system: translation_instruction(target_language),
            messages: vec![Message {
                role: "user",
                content: text.to_string(),
            }],
        };

        let url = format!("{}/messages", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| SubtransError::Api(format!("Claude request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SubtransError::Api(format!("Failed to read Claude response: {e}")))?;

        if !status.is_success() {
            return Err(SubtransError::Api(format!(
                "Claude API error ({status}): {body}"
            )));
        }

        let parsed: MessagesResponse = serde_json::from_str(&body)
            .map_err(|e| SubtransError::Api(format!("Failed to parse Claude response: {e}")))?;

        // Concatenate only the text-typed segments
        let translated: String = parsed
            .content
            .into_iter()
            .filter(|segment| segment.segment_type == "text")
            .filter_map(|segment| segment.text)
            .collect::<Vec<_>>()
            .join("");

        if translated.is_empty() {
            return Err(SubtransError::Api(
                "Claude response contained no text segments".to_string(),
            ));
        }

        Ok(strip_code_fences(translated.trim()))
    }

    fn name(&self) -> &'static str {
        "claude"
    }
}
