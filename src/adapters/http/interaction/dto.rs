//! HTTP DTOs for interaction endpoints.
//!
//! Field names and shapes match the wire format the frontend already speaks:
//! snake_case keys, a sparse `current_extraction_data` object, and explicit
//! nulls on the persisted-record view.

use serde::{Deserialize, Serialize};

use crate::application::handlers::ChatTurnOutcome;
use crate::domain::interaction::{InteractionRecord, PartialRecord, Turn};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request body for the structured form endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct LogInteractionFormRequest {
    pub hcp_name: String,
    /// Calendar date in `YYYY-MM-DD` form; parsed and validated by the handler.
    pub interaction_date: String,
    #[serde(default)]
    pub products_discussed: Option<String>,
    #[serde(default)]
    pub key_discussion_points: Option<String>,
    #[serde(default)]
    pub sentiment: Option<String>,
    #[serde(default)]
    pub follow_up_actions: Option<String>,
}

/// Request body for one chat turn.
///
/// The caller round-trips the full conversational state each turn: the prior
/// history and the record accumulated so far. Both default to empty so the
/// opening turn can send just a message.
#[derive(Debug, Clone, Deserialize)]
pub struct LogInteractionChatRequest {
    pub message: String,
    #[serde(default)]
    pub history: Vec<Turn>,
    #[serde(default)]
    pub current_extraction_data: Option<PartialRecord>,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Response body for one chat turn.
///
/// Always returned with status 200: commit and generator failures ride inside
/// `ai_message` with `is_complete` false and the record kept, so the caller
/// can retry by resending the same state.
#[derive(Debug, Clone, Serialize)]
pub struct ChatTurnResponse {
    pub ai_message: String,
    pub is_complete: bool,
    pub extracted_data: PartialRecord,
    pub interaction_id: Option<u64>,
}

impl From<ChatTurnOutcome> for ChatTurnResponse {
    fn from(outcome: ChatTurnOutcome) -> Self {
        Self {
            ai_message: outcome.message,
            is_complete: outcome.complete,
            extracted_data: outcome.record,
            interaction_id: outcome.interaction_id.map(|id| id.as_u64()),
        }
    }
}

/// Persisted-record view returned by the form endpoint. Optional columns
/// serialize as explicit nulls rather than being omitted.
#[derive(Debug, Clone, Serialize)]
pub struct InteractionResponse {
    pub id: u64,
    pub hcp_name: String,
    pub interaction_date: String,
    pub products_discussed: Option<String>,
    pub key_discussion_points: Option<String>,
    pub sentiment: Option<String>,
    pub follow_up_actions: Option<String>,
    pub interaction_method: String,
    pub raw_transcript: Option<String>,
    pub created_at: String,
}

impl From<InteractionRecord> for InteractionResponse {
    fn from(record: InteractionRecord) -> Self {
        Self {
            id: record.id.as_u64(),
            hcp_name: record.hcp_name,
            interaction_date: record.interaction_date.format("%Y-%m-%d").to_string(),
            products_discussed: record.products_discussed,
            key_discussion_points: record.key_discussion_points,
            sentiment: record.sentiment.map(|s| s.as_str().to_string()),
            follow_up_actions: record.follow_up_actions,
            interaction_method: record.method.to_string(),
            raw_transcript: record.raw_transcript,
            created_at: record.created_at.to_rfc3339(),
        }
    }
}

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            code: "VALIDATION_FAILED".to_string(),
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            code: "STORE_UNAVAILABLE".to_string(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: message.into(),
        }
    }
}
