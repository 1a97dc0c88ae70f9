//! Scripted Text Generator - deterministic staged guidance.
//!
//! Replays a fixed script keyed on lexical cues in the current turn. This is
//! the default generator when no API key is configured, and doubles as the
//! offline stand-in for demos and tests. Matching is substring-based and
//! deliberately crude; the dialogue treats the reply as an opaque hint
//! either way.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::interaction::Turn;
use crate::ports::{GenerationError, TextGenerator};

static ISO_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{4}-\d{2}-\d{2}").expect("valid regex"));

/// Staged guidance script. Stateless; stage selection looks only at the
/// current turn.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptedTextGenerator;

impl ScriptedTextGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Picks the scripted reply for one turn. First matching stage wins.
    fn reply(&self, prompt: &str) -> &'static str {
        let lower = prompt.to_lowercase();

        if lower.contains("hello") || lower.contains("hi") {
            "Hello! How can I help you log an HCP interaction today?"
        } else if lower.contains("log interaction") || lower.contains("record meeting") {
            "Okay, I can help with that. Who was the HCP you met with and on what date?"
        } else if lower.contains("dr.")
            && (lower.contains("date") || lower.contains("today") || ISO_DATE.is_match(&lower))
        {
            "Great. What products were discussed and what were the key discussion points?"
        } else if (lower.contains("product") || lower.contains("discussed"))
            && lower.contains("point")
        {
            "Understood. What was the overall sentiment (Positive, Neutral, Negative) and any follow-up actions?"
        } else if lower.contains("sentiment")
            && (lower.contains("follow up") || lower.contains("follow-up") || lower.contains("action"))
        {
            "Excellent. I think I have all the details. Should I try to log this interaction now? (Type 'yes' or 'log it')"
        } else if lower.contains("yes") || lower.contains("log it") || lower.contains("correct") {
            "Understood. Attempting to log the interaction."
        } else if prompt.len() > 10 {
            "Thanks for that information. Can you tell me a bit more about [a specific missing piece, e.g., the products discussed or key topics]?"
        } else {
            "I'm sorry, I didn't quite understand. Could you please rephrase or provide more details?"
        }
    }
}

#[async_trait]
impl TextGenerator for ScriptedTextGenerator {
    async fn generate(
        &self,
        prompt: &str,
        _model: &str,
        _history: &[Turn],
    ) -> Result<String, GenerationError> {
        Ok(self.reply(prompt).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn reply_to(prompt: &str) -> String {
        ScriptedTextGenerator::new()
            .generate(prompt, "any-model", &[])
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn greets_on_hello() {
        assert_eq!(
            reply_to("hello").await,
            "Hello! How can I help you log an HCP interaction today?"
        );
    }

    #[tokio::test]
    async fn opening_request_asks_for_who_and_when() {
        assert_eq!(
            reply_to("I want to log interaction notes").await,
            "Okay, I can help with that. Who was the HCP you met with and on what date?"
        );
    }

    #[tokio::test]
    async fn name_and_date_advance_to_products() {
        let reply = reply_to("I saw Dr. Doe on 2025-06-01").await;
        assert_eq!(
            reply,
            "Great. What products were discussed and what were the key discussion points?"
        );
    }

    #[tokio::test]
    async fn products_and_points_advance_to_sentiment() {
        let reply = reply_to("We discussed ProductA and the main point was dosing").await;
        assert_eq!(
            reply,
            "Understood. What was the overall sentiment (Positive, Neutral, Negative) and any follow-up actions?"
        );
    }

    #[tokio::test]
    async fn sentiment_and_actions_offer_to_log() {
        let reply = reply_to("sentiment was positive, follow-up action: send samples").await;
        assert!(reply.starts_with("Excellent. I think I have all the details."));
    }

    #[tokio::test]
    async fn consent_acknowledges_the_attempt() {
        assert_eq!(
            reply_to("yes, log it").await,
            "Understood. Attempting to log the interaction."
        );
    }

    #[tokio::test]
    async fn longer_free_text_gets_a_generic_nudge() {
        let reply = reply_to("we mostly talked through scheduling concerns").await;
        assert!(reply.starts_with("Thanks for that information."));
    }

    #[tokio::test]
    async fn short_unrecognized_input_asks_to_rephrase() {
        assert_eq!(
            reply_to("ok").await,
            "I'm sorry, I didn't quite understand. Could you please rephrase or provide more details?"
        );
    }
}
