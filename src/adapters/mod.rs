//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Text generators (live Groq client, scripted offline stand-in)
//! - `mysql` - MySQL-backed interaction store
//! - `http` - REST endpoints for the two capture flows

pub mod ai;
pub mod http;
pub mod mysql;
