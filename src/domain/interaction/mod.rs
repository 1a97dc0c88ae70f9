//! Interaction domain module.
//!
//! Holds the field schema, the heuristic extractor that fills it from
//! conversation turns, the dialogue policy deciding each turn, and the
//! record shapes the store persists. Everything here is pure; all I/O
//! goes through the ports.

mod extractor;
mod fields;
mod policy;
mod record;

pub use extractor::FieldExtractor;
pub use fields::{Field, PartialRecord, Sentiment};
pub use policy::{DialoguePolicy, PolicyConfig, TurnDecision};
pub use record::{
    InteractionId, InteractionMethod, InteractionRecord, NewInteraction, RecordError, Role,
    Transcript, Turn,
};
