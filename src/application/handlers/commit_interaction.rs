//! CommitInteractionHandler - the single write path from a conversation to
//! the store.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::domain::interaction::{
    Field, InteractionId, InteractionMethod, NewInteraction, PartialRecord, RecordError,
    Transcript,
};
use crate::ports::{InteractionStore, StoreError};

/// Errors surfaced by a failed commit.
///
/// The caller's record and history are untouched on any of these, so the
/// same turn can simply be retried.
#[derive(Debug, Error)]
pub enum CommitError {
    #[error(transparent)]
    Record(#[from] RecordError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Handler that validates an accumulated record and persists it together
/// with its serialized transcript.
pub struct CommitInteractionHandler {
    store: Arc<dyn InteractionStore>,
}

impl CommitInteractionHandler {
    pub fn new(store: Arc<dyn InteractionStore>) -> Self {
        Self { store }
    }

    /// Promotes the record, serializes the transcript verbatim, and inserts
    /// exactly one row. On any failure nothing is written.
    pub async fn handle(
        &self,
        record: &PartialRecord,
        transcript: &Transcript,
    ) -> Result<InteractionId, CommitError> {
        let interaction = NewInteraction::from_partial(
            record,
            InteractionMethod::Chat,
            Some(transcript.to_json()),
        )?;

        if interaction.sentiment.is_none() {
            if let Some(raw) = record.get(Field::Sentiment).filter(|v| !v.trim().is_empty()) {
                debug!(value = raw, "Dropping unrecognized sentiment value");
            }
        }

        let id = self.store.insert(&interaction).await?;
        info!(
            interaction_id = %id,
            hcp_name = %interaction.hcp_name,
            turns = transcript.len(),
            "Interaction committed"
        );
        Ok(id)
    }
}
