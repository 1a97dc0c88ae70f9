//! LogFormHandler - direct structured insert for the form capture path.

use std::sync::Arc;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::info;

use crate::domain::interaction::{
    InteractionId, InteractionMethod, InteractionRecord, NewInteraction, Sentiment,
};
use crate::ports::{InteractionStore, StoreError};

/// Command carrying one form submission.
#[derive(Debug, Clone)]
pub struct LogFormCommand {
    pub hcp_name: String,
    pub interaction_date: NaiveDate,
    pub products_discussed: Option<String>,
    pub key_discussion_points: Option<String>,
    pub sentiment: Option<String>,
    pub follow_up_actions: Option<String>,
}

/// Errors from the form path.
#[derive(Debug, Error)]
pub enum LogFormError {
    /// A field failed validation; nothing reached the store.
    #[error("validation failed for {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// The row could not be read back after a successful insert.
    #[error("interaction {0} missing after insert")]
    MissingAfterInsert(InteractionId),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Handler for the non-conversational capture path: validate, insert, and
/// read the persisted row back as written.
pub struct LogFormHandler {
    store: Arc<dyn InteractionStore>,
}

impl LogFormHandler {
    pub fn new(store: Arc<dyn InteractionStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, cmd: LogFormCommand) -> Result<InteractionRecord, LogFormError> {
        let hcp_name = cmd.hcp_name.trim();
        if hcp_name.is_empty() {
            return Err(LogFormError::Validation {
                field: "hcp_name",
                message: "must not be empty".to_string(),
            });
        }

        let interaction = NewInteraction {
            hcp_name: hcp_name.to_string(),
            interaction_date: cmd.interaction_date,
            products_discussed: none_if_blank(cmd.products_discussed),
            key_discussion_points: none_if_blank(cmd.key_discussion_points),
            sentiment: cmd.sentiment.as_deref().and_then(Sentiment::parse),
            follow_up_actions: none_if_blank(cmd.follow_up_actions),
            method: InteractionMethod::Form,
            raw_transcript: None,
        };

        let id = self.store.insert(&interaction).await?;
        info!(interaction_id = %id, hcp_name = %interaction.hcp_name, "Form interaction logged");

        self.store
            .fetch(id)
            .await?
            .ok_or(LogFormError::MissingAfterInsert(id))
    }
}

fn none_if_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
