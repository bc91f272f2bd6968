//! OpenAI chat-completion translation backend.

use crate::error::{Result, SubtransError};
use crate::translate::sanitize::strip_code_fences;
use crate::translate::{translation_instruction, Translator};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

pub struct OpenAiTranslator {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiTranslator {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Set a different model (e.g. "gpt-4o").
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
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[async_trait]
impl Translator for OpenAiTranslator {
    async fn translate(&self, text: &str, target_language: &str) -> Result<String> {
        debug!("Translating {} chars to {} with OpenAI", text.len(), target_language);

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
            temperature: 0.3,
        };

        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| SubtransError::Api(format!("OpenAI request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SubtransError::Api(format!("Failed to read OpenAI response: {e}")))?;

        if !status.is_success() {
            return Err(SubtransError::Api(format!(
                "OpenAI API error ({status}): {body}"
            )));
        }

        let parsed: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| SubtransError::Api(format!("Failed to parse OpenAI response: {e}")))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| SubtransError::Api("OpenAI response contained no choices".to_string()))?;

        Ok(strip_code_fences(&content))
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}
