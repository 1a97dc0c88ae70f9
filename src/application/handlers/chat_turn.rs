//! ChatTurnHandler - orchestrates one stateless turn of the logging
//! conversation.
//!
//! Each request carries the full conversational state (turn text, history,
//! accumulated record); the server holds nothing between turns. The handler
//! never fails: generator outages degrade to a fixed prompt and commit
//! failures ride back inside the reply with the record intact.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, warn};

use crate::domain::interaction::{
    DialoguePolicy, FieldExtractor, InteractionId, PartialRecord, Transcript, Turn, TurnDecision,
};
use crate::ports::{StoreError, TextGenerator};

use super::commit_interaction::{CommitError, CommitInteractionHandler};

/// One turn of user input plus all caller-carried state.
#[derive(Debug, Clone)]
pub struct ChatTurnCommand {
    pub message: String,
    pub history: Vec<Turn>,
    pub record: PartialRecord,
}

/// Outcome of one turn.
///
/// Always a normal reply; failures ride inside `message` with `complete`
/// false so the caller can retry by resending the same state.
#[derive(Debug, Clone)]
pub struct ChatTurnOutcome {
    pub message: String,
    pub complete: bool,
    pub record: PartialRecord,
    pub interaction_id: Option<InteractionId>,
}

/// Handler for one request/response turn.
pub struct ChatTurnHandler {
    extractor: FieldExtractor,
    policy: DialoguePolicy,
    generator: Arc<dyn TextGenerator>,
    committer: Arc<CommitInteractionHandler>,
    model: String,
}

impl ChatTurnHandler {
    pub fn new(
        extractor: FieldExtractor,
        policy: DialoguePolicy,
        generator: Arc<dyn TextGenerator>,
        committer: Arc<CommitInteractionHandler>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            extractor,
            policy,
            generator,
            committer,
            model: model.into(),
        }
    }

    /// Runs extraction over the turn, then gathers, confirms, or commits.
    pub async fn handle(&self, cmd: ChatTurnCommand) -> ChatTurnOutcome {
        let today = Utc::now().date_naive();
        let record = self.extractor.extract(&cmd.message, &cmd.record, today);
        let decision = self.policy.decide(&cmd.message, &record);
        debug!(
            ?decision,
            filled = record.filled_count(),
            "Turn decision made"
        );

        match decision {
            TurnDecision::Commit => self.commit(cmd, record).await,
            TurnDecision::Confirm => ChatTurnOutcome {
                message: self.policy.confirmation_message(&record),
                complete: false,
                record,
                interaction_id: None,
            },
            TurnDecision::Gather => ChatTurnOutcome {
                message: self.guidance(&cmd).await,
                complete: false,
                record,
                interaction_id: None,
            },
        }
    }

    /// Next-turn hint from the generator. An outage never fails the turn;
    /// the reply degrades to a fixed clarifying prompt.
    async fn guidance(&self, cmd: &ChatTurnCommand) -> String {
        match self
            .generator
            .generate(&cmd.message, &self.model, &cmd.history)
            .await
        {
            Ok(reply) => reply,
            Err(err) => {
                warn!(error = %err, "Text generator failed, degrading to fixed prompt");
                self.policy.clarify_fallback_message().to_string()
            }
        }
    }

    async fn commit(&self, cmd: ChatTurnCommand, record: PartialRecord) -> ChatTurnOutcome {
        // The stored transcript ends with the attempt message, mirroring
        // what the user saw when consent was given.
        let mut transcript = Transcript::from_turns(cmd.history);
        transcript.push(Turn::user(cmd.message));
        transcript.push(Turn::assistant(self.policy.commit_attempt_message(&record)));

        match self.committer.handle(&record, &transcript).await {
            Ok(id) => ChatTurnOutcome {
                message: self.policy.commit_success_message(id, &record),
                complete: true,
                record: PartialRecord::new(),
                interaction_id: Some(id),
            },
            Err(err) => {
                error!(error = %err, "Commit failed, conversation state kept for retry");
                ChatTurnOutcome {
                    message: commit_failure_message(&err),
                    complete: false,
                    record,
                    interaction_id: None,
                }
            }
        }
    }
}

fn commit_failure_message(err: &CommitError) -> String {
    match err {
        CommitError::Store(StoreError::Unavailable { .. }) => {
            "Error: Could not connect to the database to log interaction.".to_string()
        }
        CommitError::Store(store_err) => {
            format!("Error logging interaction to database: {store_err}")
        }
        other => format!("Error logging interaction: {other}"),
    }
}
