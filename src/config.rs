use crate::error::{Result, SubtransError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Translation backend identity selectable by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    OpenAi,
    Gemini,
    Claude,
    OpenRouter,
}

impl Backend {
    /// Environment variable holding this backend's credential.
    pub fn env_var(&self) -> &'static str {
        match self {
            Backend::OpenAi => "OPENAI_API_KEY",
            Backend::Gemini => "GEMINI_API_KEY",
            Backend::Claude => "ANTHROPIC_API_KEY",
            Backend::OpenRouter => "OPENROUTER_API_KEY",
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::OpenAi => write!(f, "openai"),
            Backend::Gemini => write!(f, "gemini"),
            Backend::Claude => write!(f, "claude"),
            Backend::OpenRouter => write!(f, "openrouter"),
        }
    }
}

impl std::str::FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(Backend::OpenAi),
            "gemini" => Ok(Backend::Gemini),
            "claude" => Ok(Backend::Claude),
            "openrouter" => Ok(Backend::OpenRouter),
            _ => Err(format!(
                "Unknown backend: {}. Use 'openai', 'gemini', 'claude' or 'openrouter'",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub openrouter_api_key: Option<String>,
    #[serde(default)]
    pub default_backend: Backend,
}

impl Config {
    /// Load configuration from the config file, then override with
    /// environment variables.
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        if let Some(config_path) = Self::config_file_path() {
            if config_path.exists() {
                let contents = std::fs::read_to_string(&config_path)?;
                if let Ok(file_config) = toml::from_str::<Config>(&contents) {
                    config = file_config;
                }
            }
        }

        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            config.openai_api_key = Some(key);
        }
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            config.gemini_api_key = Some(key);
        }
        if let Ok(key) = std::env::var("ANTHROPIC_API_KEY") {
            config.anthropic_api_key = Some(key);
        }
        if let Ok(key) = std::env::var("OPENROUTER_API_KEY") {
            config.openrouter_api_key = Some(key);
        }
        if let Ok(backend) = std::env::var("SUBTRANS_DEFAULT_BACKEND") {
            if let Ok(b) = backend.parse() {
                config.default_backend = b;
            }
        }

        Ok(config)
    }

    /// Credential for the given backend, if present and non-empty.
    ///
    /// Credential format is backend-specific and not validated here beyond
    /// non-emptiness.
    pub fn api_key(&self, backend: Backend) -> Option<&str> {
        let key = match backend {
            Backend::OpenAi => self.openai_api_key.as_deref(),
            Backend::Gemini => self.gemini_api_key.as_deref(),
            Backend::Claude => self.anthropic_api_key.as_deref(),
            Backend::OpenRouter => self.openrouter_api_key.as_deref(),
        };
        key.filter(|k| !k.trim().is_empty())
    }

    /// Fail early when the selected backend has no credential, before any
    /// backend call is attempted.
    pub fn validate(&self, backend: Backend) -> Result<()> {
        if self.api_key(backend).is_none() {
            return Err(SubtransError::Config(format!(
                "{} API key not set. Export it with: export {}=...",
                backend,
                backend.env_var()
            )));
        }
        Ok(())
    }

    fn config_file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("subtrans").join("config.toml"))
    }
}
