//! HTTP adapters - REST API implementations.

pub mod interaction;

pub use interaction::{interaction_routes, InteractionHandlers};
