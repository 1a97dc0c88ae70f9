//! Conversation turns and the persisted interaction record shapes.
//!
//! `Transcript` is the append-only turn history the caller round-trips with
//! each request; at commit it is serialized verbatim into the stored row.
//! `NewInteraction` is the validated, store-ready form of a `PartialRecord`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::fields::{Field, PartialRecord, Sentiment};

/// Speaker of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One exchange in a logging conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    /// Creates a user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Creates an assistant turn.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Ordered, append-only turn history for one conversation.
///
/// Serializes transparently as a JSON array of turns, which is also the
/// exact shape written to the store's `raw_transcript` column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    /// Creates an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transcript from an existing turn history.
    pub fn from_turns(turns: Vec<Turn>) -> Self {
        Self { turns }
    }

    /// Appends a turn. Existing turns are never reordered or rewritten.
    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// All turns in arrival order.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// The verbatim JSON form written to the store at commit time.
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.turns).expect("serialize transcript turns")
    }
}

/// How an interaction reached the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionMethod {
    Form,
    Chat,
}

impl InteractionMethod {
    /// Lowercase token stored in the `interaction_method` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionMethod::Form => "form",
            InteractionMethod::Chat => "chat",
        }
    }

    /// Parses the stored column token.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "form" => Some(InteractionMethod::Form),
            "chat" => Some(InteractionMethod::Chat),
            _ => None,
        }
    }
}

impl fmt::Display for InteractionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Store-assigned surrogate identifier for a persisted interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InteractionId(u64);

impl InteractionId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for InteractionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Why a partial record could not be promoted to a store-ready interaction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("missing mandatory field: {0}")]
    MissingField(Field),
    #[error("invalid interaction date: {0}")]
    InvalidDate(String),
}

/// A validated interaction ready for insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct NewInteraction {
    pub hcp_name: String,
    pub interaction_date: NaiveDate,
    pub products_discussed: Option<String>,
    pub key_discussion_points: Option<String>,
    pub sentiment: Option<Sentiment>,
    pub follow_up_actions: Option<String>,
    pub method: InteractionMethod,
    pub raw_transcript: Option<String>,
}

impl NewInteraction {
    /// Promotes a caller-carried partial record to a store-ready interaction.
    ///
    /// Both mandatory fields must be present and the date must be a real
    /// calendar date in `YYYY-MM-DD` form. Sentiment is parsed leniently:
    /// a value outside the allowed enumeration is dropped, not rejected.
    pub fn from_partial(
        record: &PartialRecord,
        method: InteractionMethod,
        raw_transcript: Option<String>,
    ) -> Result<Self, RecordError> {
        let hcp_name = record
            .get(Field::HcpName)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or(RecordError::MissingField(Field::HcpName))?
            .to_string();

        let raw_date = record
            .get(Field::InteractionDate)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or(RecordError::MissingField(Field::InteractionDate))?;
        let interaction_date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d")
            .map_err(|_| RecordError::InvalidDate(raw_date.to_string()))?;

        Ok(Self {
            hcp_name,
            interaction_date,
            products_discussed: optional_value(record, Field::ProductsDiscussed),
            key_discussion_points: optional_value(record, Field::KeyDiscussionPoints),
            sentiment: record.get(Field::Sentiment).and_then(Sentiment::parse),
            follow_up_actions: optional_value(record, Field::FollowUpActions),
            method,
            raw_transcript,
        })
    }
}

fn optional_value(record: &PartialRecord, field: Field) -> Option<String> {
    record
        .get(field)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

/// A persisted interaction as read back from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionRecord {
    pub id: InteractionId,
    pub hcp_name: String,
    pub interaction_date: NaiveDate,
    pub products_discussed: Option<String>,
    pub key_discussion_points: Option<String>,
    pub sentiment: Option<Sentiment>,
    pub follow_up_actions: Option<String>,
    pub method: InteractionMethod,
    pub raw_transcript: Option<String>,
    pub created_at: DateTime<Utc>,
}
