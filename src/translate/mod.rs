pub mod claude;
pub mod gemini;
pub mod openai;
pub mod openrouter;
pub mod orchestrator;
pub mod sanitize;

pub use orchestrator::{TranslationOrchestrator, TranslationOutcome, TranslationStatus};

use crate::config::{Backend, Config};
use crate::error::{Result, SubtransError};
use async_trait::async_trait;

/// Uniform adapter contract for translation backends.
///
/// `target_language` is the human-readable language name; code-to-name
/// resolution happens in the orchestrator. Adapters do not retry: any
/// transport, auth or malformed-response condition surfaces as an error
/// carrying the underlying cause, and recovery is the orchestrator's job.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, target_language: &str) -> Result<String>;
    fn name(&self) -> &'static str;
}

/// The instruction every adapter sends alongside the subtitle text.
///
/// Wording is shared so all providers get the same contract: keep indices
/// and timecodes intact, translate only the caption text.
pub(crate) fn translation_instruction(target_language: &str) -> String {
    format!(
        "Translate the following subtitle text to {target_language}. \
         Keep subtitle numbers and timecodes exactly as they are. \
         Translate only the caption text, preserving line breaks. \
         Return only the translated subtitles, nothing else."
    )
}

/// Build the translator for the selected backend, using its credential
/// from the configuration.
pub fn create_translator(backend: Backend, config: &Config) -> Result<Box<dyn Translator>> {
    let key = config.api_key(backend).ok_or_else(|| {
        SubtransError::Config(format!(
            "{} API key not set. Export {}.",
            backend,
            backend.env_var()
        ))
    })?;

    Ok(match backend {
        Backend::OpenAi => Box::new(openai::OpenAiTranslator::new(key.to_string())),
        Backend::Gemini => Box::new(gemini::GeminiTranslator::new(key.to_string())),
        Backend::Claude => Box::new(claude::ClaudeTranslator::new(key.to_string())),
        Backend::OpenRouter => Box::new(openrouter::OpenRouterTranslator::new(key.to_string())),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instruction_embeds_language() {
        let instruction = translation_instruction("Japanese");
        assert!(instruction.contains("Japanese"));
        assert!(instruction.contains("timecodes"));
    }

    #[test]
    fn test_create_translator_requires_key() {
        let config = Config::default();
        assert!(create_translator(Backend::OpenAi, &config).is_err());
    }

    #[test]
    fn test_create_translator_dispatch() {
        let mut config = Config::default();
        config.openai_api_key = Some("sk-test".to_string());
        config.gemini_api_key = Some("g-test".to_string());
        config.anthropic_api_key = Some("a-test".to_string());
        config.openrouter_api_key = Some("or-test".to_string());

        assert_eq!(create_translator(Backend::OpenAi, &config).unwrap().name(), "openai");
        assert_eq!(create_translator(Backend::Gemini, &config).unwrap().name(), "gemini");
        assert_eq!(create_translator(Backend::Claude, &config).unwrap().name(), "claude");
        assert_eq!(
            create_translator(Backend::OpenRouter, &config).unwrap().name(),
            "openrouter"
        );
    }
}
