//! AI text generator configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// AI text generator configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// Which generator backs the chat guidance
    #[serde(default)]
    pub provider: AiProvider,

    /// Groq API key (required when provider is groq)
    pub groq_api_key: Option<String>,

    /// Model id sent with each completion request
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the OpenAI-compatible completions API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

/// AI generator backend
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    /// Deterministic staged script; no network traffic, no key needed
    #[default]
    Scripted,
    Groq,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if a Groq key is configured
    pub fn has_groq_key(&self) -> bool {
        self.groq_api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    /// Validate AI configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.provider == AiProvider::Groq {
            if !self.has_groq_key() {
                return Err(ValidationError::MissingRequired("GROQ_API_KEY"));
            }
            if !self
                .groq_api_key
                .as_deref()
                .is_some_and(|k| k.starts_with("gsk_"))
            {
                return Err(ValidationError::InvalidGroqKey);
            }
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: AiProvider::default(),
            groq_api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_model() -> String {
    "gemma2-9b-it".to_string()
}

fn default_base_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_timeout() -> u64 {
    30
}
