//! HCP Interaction Logger - Conversational capture of healthcare-provider
//! meeting notes.
//!
//! Field reps log HCP interactions two ways: a structured form posted in one
//! shot, or a chat in which fields are accumulated across turns and committed
//! once the rep confirms. The server is stateless between turns; the caller
//! round-trips the conversation history and the partially-filled record.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
