//! Text Generator Adapters.
//!
//! Implementations of the TextGenerator port.
//!
//! ## Available Adapters
//!
//! - `ScriptedTextGenerator` - Deterministic staged script (default, offline)
//! - `GroqTextGenerator` - Groq's OpenAI-compatible chat completions API

mod groq;
mod scripted;

pub use groq::{GroqConfig, GroqTextGenerator};
pub use scripted::ScriptedTextGenerator;
