//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `interaction` - Field schema, heuristic extraction, dialogue policy,
//!   and persisted record shapes for HCP interactions

pub mod interaction;
