//! Application handlers.
//!
//! Command handlers that orchestrate domain operations against the ports.

mod chat_turn;
mod commit_interaction;
mod log_form;

pub use chat_turn::{ChatTurnCommand, ChatTurnHandler, ChatTurnOutcome};
pub use commit_interaction::{CommitError, CommitInteractionHandler};
pub use log_form::{LogFormCommand, LogFormError, LogFormHandler};
