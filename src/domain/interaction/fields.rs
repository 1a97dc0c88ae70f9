//! The interaction field schema and the caller-carried accumulator.
//!
//! `PartialRecord` is the in-progress mapping of extracted fields for one
//! conversation. It travels with the caller between turns, so the server
//! holds no session state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The fixed schema of recognized interaction fields, in schema order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    HcpName,
    InteractionDate,
    ProductsDiscussed,
    KeyDiscussionPoints,
    Sentiment,
    FollowUpActions,
}

impl Field {
    /// All fields in schema order (also the order of confirmation summaries).
    pub const ALL: [Field; 6] = [
        Field::HcpName,
        Field::InteractionDate,
        Field::ProductsDiscussed,
        Field::KeyDiscussionPoints,
        Field::Sentiment,
        Field::FollowUpActions,
    ];

    /// The minimum field set required before a commit is permitted.
    pub const MANDATORY: [Field; 2] = [Field::HcpName, Field::InteractionDate];

    /// Snake_case field name as used on the wire and in the store.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::HcpName => "hcp_name",
            Field::InteractionDate => "interaction_date",
            Field::ProductsDiscussed => "products_discussed",
            Field::KeyDiscussionPoints => "key_discussion_points",
            Field::Sentiment => "sentiment",
            Field::FollowUpActions => "follow_up_actions",
        }
    }

    /// Human-readable label used in confirmation summaries.
    pub fn label(&self) -> &'static str {
        match self {
            Field::HcpName => "Hcp Name",
            Field::InteractionDate => "Interaction Date",
            Field::ProductsDiscussed => "Products Discussed",
            Field::KeyDiscussionPoints => "Key Discussion Points",
            Field::Sentiment => "Sentiment",
            Field::FollowUpActions => "Follow Up Actions",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Overall sentiment of an interaction, a constrained three-way enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    /// Lenient parse: case-insensitive match against the three allowed
    /// values, `None` for anything else. Callers drop unrecognized tokens
    /// rather than rejecting the record.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "positive" => Some(Sentiment::Positive),
            "neutral" => Some(Sentiment::Neutral),
            "negative" => Some(Sentiment::Negative),
            _ => None,
        }
    }

    /// Canonical capitalized form, matching the store's enum column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Neutral => "Neutral",
            Sentiment::Negative => "Negative",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The in-progress, caller-carried mapping of extracted interaction fields.
///
/// Serializes to the wire's `current_extraction_data` object: absent fields
/// are omitted entirely, so an empty record is `{}`. Absence means "not yet
/// known"; a present-but-empty string is treated as absent by every accessor
/// that judges completeness.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hcp_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interaction_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub products_discussed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_discussion_points: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up_actions: Option<String>,
}

impl PartialRecord {
    /// Creates an empty record (no fields known).
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the raw value of a field, if present.
    pub fn get(&self, field: Field) -> Option<&str> {
        let slot = match field {
            Field::HcpName => &self.hcp_name,
            Field::InteractionDate => &self.interaction_date,
            Field::ProductsDiscussed => &self.products_discussed,
            Field::KeyDiscussionPoints => &self.key_discussion_points,
            Field::Sentiment => &self.sentiment,
            Field::FollowUpActions => &self.follow_up_actions,
        };
        slot.as_deref()
    }

    /// Sets a field value.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        let slot = match field {
            Field::HcpName => &mut self.hcp_name,
            Field::InteractionDate => &mut self.interaction_date,
            Field::ProductsDiscussed => &mut self.products_discussed,
            Field::KeyDiscussionPoints => &mut self.key_discussion_points,
            Field::Sentiment => &mut self.sentiment,
            Field::FollowUpActions => &mut self.follow_up_actions,
        };
        *slot = Some(value);
    }

    /// True if the field holds a non-empty value. Empty strings count as
    /// absent so a heuristic may still fill them in.
    pub fn is_set(&self, field: Field) -> bool {
        self.get(field).is_some_and(|v| !v.trim().is_empty())
    }

    /// True when both mandatory fields are set (minimum viable record).
    pub fn is_ready(&self) -> bool {
        Field::MANDATORY.iter().all(|f| self.is_set(*f))
    }

    /// True when no field holds a non-empty value.
    pub fn is_empty(&self) -> bool {
        Field::ALL.iter().all(|f| !self.is_set(*f))
    }

    /// Non-empty fields with their values, in schema order.
    pub fn filled(&self) -> impl Iterator<Item = (Field, &str)> {
        Field::ALL.into_iter().filter_map(|field| {
            self.get(field)
                .filter(|v| !v.trim().is_empty())
                .map(|v| (field, v))
        })
    }

    /// Number of non-empty fields.
    pub fn filled_count(&self) -> usize {
        self.filled().count()
    }
}
