//! Interaction Store Port - Interface for interaction persistence.
//!
//! One write operation and one read-back operation. Inserts are atomic:
//! either the full row lands and an identifier comes back, or nothing is
//! written and the caller keeps its state for a retry.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::interaction::{InteractionId, InteractionRecord, NewInteraction};

/// Port for persisting and reading back HCP interactions.
#[async_trait]
pub trait InteractionStore: Send + Sync {
    /// Inserts a new interaction, returning the store-assigned identifier.
    async fn insert(&self, interaction: &NewInteraction) -> Result<InteractionId, StoreError>;

    /// Fetches a persisted interaction by identifier.
    async fn fetch(&self, id: InteractionId) -> Result<Option<InteractionRecord>, StoreError>;
}

/// Errors returned by interaction store implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A connection to the store could not be established or was lost.
    #[error("store unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// The store rejected the write (bad value for a constrained column).
    #[error("constraint violation: {message}")]
    ConstraintViolation {
        /// Driver-reported reason.
        message: String,
    },

    /// Any other driver failure.
    #[error("database error: {message}")]
    Database {
        /// Error details.
        message: String,
    },
}

impl StoreError {
    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a constraint violation error.
    pub fn constraint_violation(message: impl Into<String>) -> Self {
        Self::ConstraintViolation {
            message: message.into(),
        }
    }

    /// Creates a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    /// True when the failure is a connectivity problem rather than a
    /// rejected write.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_are_descriptive() {
        assert_eq!(
            StoreError::unavailable("pool timed out").to_string(),
            "store unavailable: pool timed out"
        );
        assert_eq!(
            StoreError::constraint_violation("bad sentiment value").to_string(),
            "constraint violation: bad sentiment value"
        );
    }

    #[test]
    fn only_connectivity_counts_as_unavailable() {
        assert!(StoreError::unavailable("refused").is_unavailable());
        assert!(!StoreError::database("syntax").is_unavailable());
        assert!(!StoreError::constraint_violation("dup").is_unavailable());
    }
}
