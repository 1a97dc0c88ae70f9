//! MySQL adapters - Database implementations for storage ports.

mod interaction_store;

pub use interaction_store::MySqlInteractionStore;
