//! Text Generator Port - Interface for conversational guidance providers.
//!
//! The dialogue treats generated text as an opaque hint for the user's next
//! turn; structured extraction never depends on it. Implementations connect
//! to an external chat-completions service or replay a deterministic script.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::interaction::Turn;

/// Port for next-turn guidance text.
///
/// Implementations receive the current user turn plus the prior turn
/// history and return a single free-text reply. A failure here never fails
/// the conversation; callers degrade to a fixed prompt.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generates a reply to `prompt` given the prior `history`.
    async fn generate(
        &self,
        prompt: &str,
        model: &str,
        history: &[Turn],
    ) -> Result<String, GenerationError>;
}

/// Errors returned by text generator implementations.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Provider is unavailable (connection refused, 5xx, overloaded).
    #[error("generator unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u32,
    },

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse the provider response.
    #[error("parse error: {0}")]
    Parse(String),
}

impl GenerationError {
    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a timeout error.
    pub fn timeout(timeout_secs: u32) -> Self {
        Self::Timeout { timeout_secs }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_are_descriptive() {
        assert_eq!(
            GenerationError::unavailable("503 from upstream").to_string(),
            "generator unavailable: 503 from upstream"
        );
        assert_eq!(
            GenerationError::timeout(30).to_string(),
            "request timed out after 30s"
        );
        assert_eq!(
            GenerationError::AuthenticationFailed.to_string(),
            "authentication failed"
        );
    }
}
