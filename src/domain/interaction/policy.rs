//! Turn-level dialogue decisions: gather, confirm, or commit.
//!
//! The policy looks only at the current turn's text and the accumulated
//! record. Consent is lexical (affirmative cue substrings) and never
//! overrides readiness: an affirmative turn over an incomplete record
//! still gathers.

use super::fields::{Field, PartialRecord};
use super::record::InteractionId;

/// Lexical cues that count as user consent to log the interaction.
#[derive(Debug, Clone)]
pub struct PolicyConfig {
    /// Lowercased substrings matched against the whole turn.
    pub affirmative_cues: Vec<String>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            affirmative_cues: vec![
                "log it".to_string(),
                "yes".to_string(),
                "correct".to_string(),
            ],
        }
    }
}

/// What to do with the current turn, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnDecision {
    /// Consent given over a ready record: persist now.
    Commit,
    /// Record is ready but consent is missing: play back a summary.
    Confirm,
    /// Mandatory fields still missing: keep gathering.
    Gather,
}

/// Decision rules and response wording for one conversational turn.
#[derive(Debug, Clone, Default)]
pub struct DialoguePolicy {
    config: PolicyConfig,
}

impl DialoguePolicy {
    pub fn new(config: PolicyConfig) -> Self {
        Self { config }
    }

    /// True when the turn contains any affirmative cue, case-insensitively.
    pub fn is_affirmative(&self, text: &str) -> bool {
        let lowered = text.to_lowercase();
        self.config
            .affirmative_cues
            .iter()
            .any(|cue| lowered.contains(cue.as_str()))
    }

    /// Decides the current turn. Commit requires both consent and a ready
    /// record; consent alone never commits an incomplete record.
    pub fn decide(&self, text: &str, record: &PartialRecord) -> TurnDecision {
        let ready = record.is_ready();
        if ready && self.is_affirmative(text) {
            TurnDecision::Commit
        } else if ready {
            TurnDecision::Confirm
        } else {
            TurnDecision::Gather
        }
    }

    /// `Label: value` pairs for every non-empty field, in schema order.
    pub fn summary(&self, record: &PartialRecord) -> String {
        record
            .filled()
            .map(|(field, value)| format!("{}: {}", field.label(), value))
            .collect::<Vec<String>>()
            .join("; ")
    }

    /// Played back when the record is ready but consent is missing.
    pub fn confirmation_message(&self, record: &PartialRecord) -> String {
        format!(
            "Okay, I have the following details: {}. Is this correct and shall I log it?",
            self.summary(record)
        )
    }

    /// Appended to the transcript just before the commit attempt.
    pub fn commit_attempt_message(&self, record: &PartialRecord) -> String {
        format!(
            "Okay, attempting to log the interaction with {}. One moment...",
            hcp_display(record)
        )
    }

    /// Returned once the store acknowledges the insert.
    pub fn commit_success_message(&self, id: InteractionId, record: &PartialRecord) -> String {
        format!(
            "Successfully logged interaction (ID: {}) with {}.",
            id,
            hcp_display(record)
        )
    }

    /// Generic clarifying prompt when no better guidance is available.
    pub fn clarify_fallback_message(&self) -> &'static str {
        "I'm sorry, I didn't quite understand. Could you please rephrase or provide more details?"
    }
}

fn hcp_display(record: &PartialRecord) -> &str {
    record
        .get(Field::HcpName)
        .filter(|v| !v.trim().is_empty())
        .unwrap_or("the HCP")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready_record() -> PartialRecord {
        let mut record = PartialRecord::new();
        record.set(Field::HcpName, "Jane Doe");
        record.set(Field::InteractionDate, "2025-06-01");
        record
    }

    mod affirmative {
        use super::*;

        #[test]
        fn recognizes_each_cue() {
            let policy = DialoguePolicy::default();
            assert!(policy.is_affirmative("yes"));
            assert!(policy.is_affirmative("please log it"));
            assert!(policy.is_affirmative("that is correct"));
        }

        #[test]
        fn matching_ignores_case() {
            let policy = DialoguePolicy::default();
            assert!(policy.is_affirmative("YES, LOG IT"));
            assert!(policy.is_affirmative("Correct."));
        }

        #[test]
        fn matching_is_substring_based() {
            // Lexical cues only; "yesterday" carries a "yes".
            let policy = DialoguePolicy::default();
            assert!(policy.is_affirmative("yesterday we met"));
        }

        #[test]
        fn plain_chatter_is_not_consent() {
            let policy = DialoguePolicy::default();
            assert!(!policy.is_affirmative("Met with Dr. Jane Doe today"));
            assert!(!policy.is_affirmative(""));
        }
    }

    mod decide {
        use super::*;

        #[test]
        fn consent_over_ready_record_commits() {
            let policy = DialoguePolicy::default();
            assert_eq!(
                policy.decide("yes, log it", &ready_record()),
                TurnDecision::Commit
            );
        }

        #[test]
        fn consent_over_incomplete_record_still_gathers() {
            let policy = DialoguePolicy::default();
            assert_eq!(
                policy.decide("yes, log it", &PartialRecord::new()),
                TurnDecision::Gather
            );

            let mut only_name = PartialRecord::new();
            only_name.set(Field::HcpName, "Jane Doe");
            assert_eq!(policy.decide("log it", &only_name), TurnDecision::Gather);
        }

        #[test]
        fn ready_record_without_consent_confirms() {
            let policy = DialoguePolicy::default();
            assert_eq!(
                policy.decide("that was the whole visit", &ready_record()),
                TurnDecision::Confirm
            );
        }

        #[test]
        fn incomplete_record_without_consent_gathers() {
            let policy = DialoguePolicy::default();
            assert_eq!(
                policy.decide("hello", &PartialRecord::new()),
                TurnDecision::Gather
            );
        }
    }

    mod messages {
        use super::*;

        #[test]
        fn confirmation_lists_fields_in_schema_order() {
            let mut record = ready_record();
            record.set(Field::Sentiment, "Positive");

            let message = DialoguePolicy::default().confirmation_message(&record);
            assert_eq!(
                message,
                "Okay, I have the following details: Hcp Name: Jane Doe; \
                 Interaction Date: 2025-06-01; Sentiment: Positive. \
                 Is this correct and shall I log it?"
            );
        }

        #[test]
        fn attempt_message_names_the_hcp() {
            let message = DialoguePolicy::default().commit_attempt_message(&ready_record());
            assert_eq!(
                message,
                "Okay, attempting to log the interaction with Jane Doe. One moment..."
            );
        }

        #[test]
        fn success_message_carries_the_store_id() {
            let message = DialoguePolicy::default()
                .commit_success_message(InteractionId::new(42), &ready_record());
            assert_eq!(
                message,
                "Successfully logged interaction (ID: 42) with Jane Doe."
            );
        }

        #[test]
        fn missing_name_falls_back_to_generic_subject() {
            let message =
                DialoguePolicy::default().commit_attempt_message(&PartialRecord::new());
            assert_eq!(
                message,
                "Okay, attempting to log the interaction with the HCP. One moment..."
            );
        }
    }
}
