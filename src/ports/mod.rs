//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `TextGenerator` - Port for conversational guidance text
//! - `InteractionStore` - Port for interaction persistence

mod interaction_store;
mod text_generator;

pub use interaction_store::{InteractionStore, StoreError};
pub use text_generator::{GenerationError, TextGenerator};
