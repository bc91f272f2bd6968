//! OpenRouter translation backend.
//!
//! OpenRouter aggregates many models behind an OpenAI-compatible chat
//! schema, so the request body mirrors the OpenAI adapter; only auth and
//! endpoint differ.

use crate::error::{Result, SubtransError};
use crate::translate::sanitize::strip_code_fences;
use crate::translate::{translation_instruction, Translator};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
const DEFAULT_MODEL: &str = "openai/gpt-4o-mini";

pub struct OpenRouterTranslator {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenRouterTranslator {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Set a different model route (e.g. "anthropic/claude-3.5-sonnet").
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
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[async_trait]
impl Translator for OpenRouterTranslator {
    async fn translate(&self, text: &str, target_language: &str) -> Result<String> {
        debug!(
            "Translating {} chars to {} with OpenRouter ({})",
            text.len(),
            target_language,
            self.model
        );

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: translation_instruction(target_language),
                },
                ChatMessage {
                    role: "user",
                    content: text.to_string(),
                },
            ],
        };

        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| SubtransError::Api(format!("OpenRouter request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SubtransError::Api(format!("Failed to read OpenRouter response: {e}")))?;

        if !status.is_success() {
            return Err(SubtransError::Api(format!(
                "OpenRouter API error ({status}): {body}"
            )));
        }

        let parsed: Value = serde_json::from_str(&body)
            .map_err(|e| SubtransError::Api(format!("Failed to parse OpenRouter response: {e}")))?;

        let content = parsed["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                SubtransError::Api("OpenRouter response had no message content".to_string())
            })?;

        Ok(strip_code_fences(content))
    }

    fn name(&self) -> &'static str {
        "openrouter"
    }
}
