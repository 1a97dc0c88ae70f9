//! Integration tests for the conversational logging flow.
//!
//! These tests drive the chat turn handler end to end against an in-memory
//! store:
//! 1. Fields accumulate across turns while the caller round-trips state
//! 2. A ready record triggers confirmation, never a silent commit
//! 3. Consent commits exactly once and stores the full transcript
//! 4. A failed commit keeps the caller's state so the same turn can be retried

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use hcp_interaction_logger::adapters::ai::ScriptedTextGenerator;
use hcp_interaction_logger::application::handlers::{
    ChatTurnCommand, ChatTurnHandler, CommitInteractionHandler, LogFormCommand, LogFormHandler,
};
use hcp_interaction_logger::domain::interaction::{
    DialoguePolicy, Field, FieldExtractor, InteractionId, InteractionMethod, InteractionRecord,
    NewInteraction, PartialRecord, Sentiment, Turn,
};
use hcp_interaction_logger::ports::{GenerationError, InteractionStore, StoreError, TextGenerator};

// =============================================================================
// Test Infrastructure
// =============================================================================

/// In-memory interaction store for testing
struct InMemoryInteractionStore {
    rows: Mutex<Vec<InteractionRecord>>,
    fail_next_insert: AtomicBool,
}

impl InMemoryInteractionStore {
    fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            fail_next_insert: AtomicBool::new(false),
        }
    }

    fn fail_next_insert(&self) {
        self.fail_next_insert.store(true, Ordering::SeqCst);
    }

    fn rows(&self) -> Vec<InteractionRecord> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl InteractionStore for InMemoryInteractionStore {
    async fn insert(&self, interaction: &NewInteraction) -> Result<InteractionId, StoreError> {
        if self.fail_next_insert.swap(false, Ordering::SeqCst) {
            return Err(StoreError::unavailable("connection refused"));
        }
        let mut rows = self.rows.lock().unwrap();
        let id = InteractionId::new(rows.len() as u64 + 1);
        rows.push(InteractionRecord {
            id,
            hcp_name: interaction.hcp_name.clone(),
            interaction_date: interaction.interaction_date,
            products_discussed: interaction.products_discussed.clone(),
            key_discussion_points: interaction.key_discussion_points.clone(),
            sentiment: interaction.sentiment,
            follow_up_actions: interaction.follow_up_actions.clone(),
            method: interaction.method,
            raw_transcript: interaction.raw_transcript.clone(),
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn fetch(&self, id: InteractionId) -> Result<Option<InteractionRecord>, StoreError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|row| row.id == id)
            .cloned())
    }
}

/// Generator that always fails, for degradation tests
struct FailingTextGenerator;

#[async_trait]
impl TextGenerator for FailingTextGenerator {
    async fn generate(
        &self,
        _prompt: &str,
        _model: &str,
        _history: &[Turn],
    ) -> Result<String, GenerationError> {
        Err(GenerationError::network("dns failure"))
    }
}

fn chat_handler(
    generator: Arc<dyn TextGenerator>,
    store: Arc<InMemoryInteractionStore>,
) -> ChatTurnHandler {
    ChatTurnHandler::new(
        FieldExtractor::new(),
        DialoguePolicy::default(),
        generator,
        Arc::new(CommitInteractionHandler::new(store)),
        "gemma2-9b-it",
    )
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn full_conversation_confirms_then_commits_with_transcript() {
    let store = Arc::new(InMemoryInteractionStore::new());
    let handler = chat_handler(Arc::new(ScriptedTextGenerator::new()), store.clone());

    // Turn 1: one message carrying name, date, and a product keyword.
    let first_message = "I met with Dr. Jane Doe on 2025-06-01 to discuss ProductA.";
    let first = handler
        .handle(ChatTurnCommand {
            message: first_message.to_string(),
            history: vec![],
            record: PartialRecord::new(),
        })
        .await;

    assert!(!first.complete);
    assert_eq!(first.interaction_id, None);
    assert_eq!(first.record.get(Field::HcpName), Some("Jane Doe"));
    assert_eq!(first.record.get(Field::InteractionDate), Some("2025-06-01"));
    assert_eq!(first.record.get(Field::ProductsDiscussed), Some("ProductA"));
    assert!(first.message.starts_with("Okay, I have the following details:"));
    assert!(first.message.contains("Hcp Name: Jane Doe"));
    assert!(first.message.contains("Interaction Date: 2025-06-01"));
    assert!(first.message.ends_with("Is this correct and shall I log it?"));
    assert!(store.rows().is_empty());

    // Turn 2: the caller round-trips history and record, then consents.
    let history = vec![
        Turn::user(first_message),
        Turn::assistant(first.message.clone()),
    ];
    let second = handler
        .handle(ChatTurnCommand {
            message: "yes, log it".to_string(),
            history,
            record: first.record,
        })
        .await;

    assert!(second.complete);
    assert_eq!(second.interaction_id, Some(InteractionId::new(1)));
    assert_eq!(
        second.message,
        "Successfully logged interaction (ID: 1) with Jane Doe."
    );
    assert!(second.record.is_empty());

    let rows = store.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].hcp_name, "Jane Doe");
    assert_eq!(
        rows[0].interaction_date,
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    );
    assert_eq!(rows[0].products_discussed.as_deref(), Some("ProductA"));
    assert_eq!(rows[0].method, InteractionMethod::Chat);

    // Stored transcript is the JSON turn array: prior history, the consent
    // turn, and the attempt message the user saw.
    let transcript = rows[0].raw_transcript.as_deref().unwrap();
    assert!(transcript.starts_with("[{"));
    assert!(transcript.contains(first_message));
    assert!(transcript.contains("yes, log it"));
    assert!(transcript
        .contains("Okay, attempting to log the interaction with Jane Doe. One moment..."));
}

#[tokio::test]
async fn ready_record_without_consent_never_commits() {
    let store = Arc::new(InMemoryInteractionStore::new());
    let handler = chat_handler(Arc::new(ScriptedTextGenerator::new()), store.clone());

    let mut record = PartialRecord::new();
    record.set(Field::HcpName, "Jane Doe");
    record.set(Field::InteractionDate, "2025-06-01");

    let outcome = handler
        .handle(ChatTurnCommand {
            message: "that should be everything".to_string(),
            history: vec![],
            record,
        })
        .await;

    assert!(!outcome.complete);
    assert_eq!(outcome.interaction_id, None);
    assert!(outcome.message.ends_with("Is this correct and shall I log it?"));
    assert!(store.rows().is_empty());
}

#[tokio::test]
async fn failed_commit_keeps_state_and_the_retry_succeeds() {
    let store = Arc::new(InMemoryInteractionStore::new());
    let handler = chat_handler(Arc::new(ScriptedTextGenerator::new()), store.clone());

    let mut record = PartialRecord::new();
    record.set(Field::HcpName, "Jane Doe");
    record.set(Field::InteractionDate, "2025-06-01");

    store.fail_next_insert();
    let failed = handler
        .handle(ChatTurnCommand {
            message: "yes, log it".to_string(),
            history: vec![],
            record: record.clone(),
        })
        .await;

    assert!(!failed.complete);
    assert_eq!(failed.interaction_id, None);
    assert_eq!(
        failed.message,
        "Error: Could not connect to the database to log interaction."
    );
    assert_eq!(failed.record, record);
    assert!(store.rows().is_empty());

    // The caller resends the identical turn once the store is back.
    let retried = handler
        .handle(ChatTurnCommand {
            message: "yes, log it".to_string(),
            history: vec![],
            record: failed.record,
        })
        .await;

    assert!(retried.complete);
    assert_eq!(retried.interaction_id, Some(InteractionId::new(1)));
    assert_eq!(store.rows().len(), 1);
}

#[tokio::test]
async fn generator_outage_degrades_the_turn_instead_of_failing_it() {
    let store = Arc::new(InMemoryInteractionStore::new());
    let handler = chat_handler(Arc::new(FailingTextGenerator), store.clone());

    let outcome = handler
        .handle(ChatTurnCommand {
            message: "we talked for a while".to_string(),
            history: vec![],
            record: PartialRecord::new(),
        })
        .await;

    assert!(!outcome.complete);
    assert_eq!(
        outcome.message,
        "I'm sorry, I didn't quite understand. Could you please rephrase or provide more details?"
    );
    assert!(store.rows().is_empty());
}

#[tokio::test]
async fn scripted_generator_walks_the_gathering_stages() {
    let store = Arc::new(InMemoryInteractionStore::new());
    let handler = chat_handler(Arc::new(ScriptedTextGenerator::new()), store);

    let outcome = handler
        .handle(ChatTurnCommand {
            message: "I want to log interaction notes".to_string(),
            history: vec![],
            record: PartialRecord::new(),
        })
        .await;

    assert!(!outcome.complete);
    assert_eq!(
        outcome.message,
        "Okay, I can help with that. Who was the HCP you met with and on what date?"
    );
}

#[tokio::test]
async fn form_path_inserts_and_reads_back_the_row() {
    let store = Arc::new(InMemoryInteractionStore::new());
    let handler = LogFormHandler::new(store.clone());

    let record = handler
        .handle(LogFormCommand {
            hcp_name: "Dr. Jane Doe".to_string(),
            interaction_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            products_discussed: Some("ProductA, ProductB".to_string()),
            key_discussion_points: Some("Efficacy data".to_string()),
            sentiment: Some("Positive".to_string()),
            follow_up_actions: None,
        })
        .await
        .unwrap();

    assert_eq!(record.id, InteractionId::new(1));
    assert_eq!(record.hcp_name, "Dr. Jane Doe");
    assert_eq!(record.method, InteractionMethod::Form);
    assert_eq!(record.sentiment, Some(Sentiment::Positive));
    assert_eq!(record.raw_transcript, None);
    assert_eq!(store.rows().len(), 1);
}
