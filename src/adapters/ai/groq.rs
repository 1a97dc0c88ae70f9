//! Groq Text Generator - Implementation of TextGenerator against Groq's
//! OpenAI-compatible chat completions API.
//!
//! Guidance text is best-effort, so this adapter makes exactly one attempt
//! per turn: no retries, no streaming. Callers degrade to a fixed prompt on
//! any error.
//!
//! # Configuration
//!
//! ```ignore
//! let config = GroqConfig::new(api_key)
//!     .with_base_url("https://api.groq.com/openai/v1")
//!     .with_timeout(Duration::from_secs(30));
//!
//! let generator = GroqTextGenerator::new(config);
//! ```

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::interaction::{Role, Turn};
use crate::ports::{GenerationError, TextGenerator};

const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_MAX_TOKENS: u32 = 500;

/// Configuration for the Groq adapter.
#[derive(Debug, Clone)]
pub struct GroqConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Base URL for the API (default: https://api.groq.com/openai/v1).
    pub base_url: String,
    /// Request timeout; the single attempt is abandoned past this.
    pub timeout: Duration,
}

impl GroqConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            base_url: "https://api.groq.com/openai/v1".to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Exposes the API key (for making requests).
    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Groq chat completions implementation.
pub struct GroqTextGenerator {
    config: GroqConfig,
    client: Client,
}

impl GroqTextGenerator {
    /// Creates a new generator with the given configuration.
    pub fn new(config: GroqConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    /// Builds the chat completions endpoint URL.
    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    /// Converts the turn history plus current prompt to Groq's format.
    fn to_groq_request(&self, prompt: &str, model: &str, history: &[Turn]) -> GroqRequest {
        let mut messages: Vec<GroqMessage> = history
            .iter()
            .map(|turn| GroqMessage {
                role: match turn.role {
                    Role::User => "user",
                    Role::Assistant => "assistant",
                }
                .to_string(),
                content: turn.content.clone(),
            })
            .collect();

        messages.push(GroqMessage {
            role: "user".to_string(),
            content: prompt.to_string(),
        });

        GroqRequest {
            model: model.to_string(),
            messages,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Parses the API response status and handles errors.
    async fn handle_response_status(&self, response: Response) -> Result<Response, GenerationError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();

        match status.as_u16() {
            401 => Err(GenerationError::AuthenticationFailed),
            429 => Err(GenerationError::unavailable(format!(
                "Rate limited: {}",
                error_body
            ))),
            500..=599 => Err(GenerationError::unavailable(format!(
                "Server error {}: {}",
                status, error_body
            ))),
            _ => Err(GenerationError::network(format!(
                "Unexpected status {}: {}",
                status, error_body
            ))),
        }
    }
}

#[async_trait]
impl TextGenerator for GroqTextGenerator {
    async fn generate(
        &self,
        prompt: &str,
        model: &str,
        history: &[Turn],
    ) -> Result<String, GenerationError> {
        let request = self.to_groq_request(prompt, model, history);

        let response = self
            .client
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::timeout(self.config.timeout.as_secs() as u32)
                } else if e.is_connect() {
                    GenerationError::network(format!("Connection failed: {}", e))
                } else {
                    GenerationError::network(e.to_string())
                }
            })?;

        let response = self.handle_response_status(response).await?;

        let groq_response: GroqResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::parse(format!("Failed to parse response: {}", e)))?;

        groq_response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| GenerationError::parse("No choices in response"))
    }
}

#[derive(Debug, Serialize)]
struct GroqRequest {
    model: String,
    messages: Vec<GroqMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct GroqMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct GroqResponse {
    choices: Vec<GroqChoice>,
}

#[derive(Debug, Deserialize)]
struct GroqChoice {
    message: GroqMessage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder_works() {
        let config = GroqConfig::new("gsk_test")
            .with_base_url("https://custom.api.com/v1")
            .with_timeout(Duration::from_secs(10));

        assert_eq!(config.base_url, "https://custom.api.com/v1");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.api_key(), "gsk_test");
    }

    #[test]
    fn completions_url_joins_base_and_path() {
        let generator = GroqTextGenerator::new(GroqConfig::new("gsk_test"));
        assert_eq!(
            generator.completions_url(),
            "https://api.groq.com/openai/v1/chat/completions"
        );
    }

    #[test]
    fn request_carries_history_then_current_prompt() {
        let generator = GroqTextGenerator::new(GroqConfig::new("gsk_test"));
        let history = vec![
            Turn::user("I met Dr. Doe"),
            Turn::assistant("On what date?"),
        ];

        let request = generator.to_groq_request("It was today", "gemma2-9b-it", &history);

        assert_eq!(request.model, "gemma2-9b-it");
        assert_eq!(request.messages.len(), 3);
        assert_eq!(request.messages[0].role, "user");
        assert_eq!(request.messages[1].role, "assistant");
        assert_eq!(request.messages[2].role, "user");
        assert_eq!(request.messages[2].content, "It was today");
    }

    #[test]
    fn request_serializes_sampling_defaults() {
        let generator = GroqTextGenerator::new(GroqConfig::new("gsk_test"));
        let request = generator.to_groq_request("hello", "gemma2-9b-it", &[]);

        let json = serde_json::to_value(&request).unwrap();
        let temperature = json["temperature"].as_f64().unwrap();
        assert!((temperature - 0.7).abs() < 1e-6);
        assert_eq!(json["max_tokens"], 500);
    }
}
