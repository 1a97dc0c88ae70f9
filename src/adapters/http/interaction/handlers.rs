//! HTTP handlers for interaction endpoints.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde_json::json;

use crate::application::handlers::{
    ChatTurnCommand, ChatTurnHandler, LogFormCommand, LogFormError, LogFormHandler,
};

use super::dto::{
    ChatTurnResponse, ErrorResponse, InteractionResponse, LogInteractionChatRequest,
    LogInteractionFormRequest,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct InteractionHandlers {
    chat_handler: Arc<ChatTurnHandler>,
    form_handler: Arc<LogFormHandler>,
}

impl InteractionHandlers {
    pub fn new(chat_handler: Arc<ChatTurnHandler>, form_handler: Arc<LogFormHandler>) -> Self {
        Self {
            chat_handler,
            form_handler,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/log_interaction_form - Log a structured form submission
pub async fn log_interaction_form(
    State(handlers): State<InteractionHandlers>,
    Json(req): Json<LogInteractionFormRequest>,
) -> Response {
    let raw_date = req.interaction_date.trim();
    let interaction_date = match NaiveDate::parse_from_str(raw_date, "%Y-%m-%d") {
        Ok(date) => date,
        Err(_) => {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorResponse::validation(format!(
                    "interaction_date must be a YYYY-MM-DD calendar date, got '{}'",
                    raw_date
                ))),
            )
                .into_response()
        }
    };

    let cmd = LogFormCommand {
        hcp_name: req.hcp_name,
        interaction_date,
        products_discussed: req.products_discussed,
        key_discussion_points: req.key_discussion_points,
        sentiment: req.sentiment,
        follow_up_actions: req.follow_up_actions,
    };

    match handlers.form_handler.handle(cmd).await {
        Ok(record) => {
            let response: InteractionResponse = record.into();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_form_error(e),
    }
}

/// POST /api/log_interaction_chat - Process one conversational turn
///
/// Always answers 200: failures along the turn are folded into the reply so
/// the caller keeps its state and can retry.
pub async fn log_interaction_chat(
    State(handlers): State<InteractionHandlers>,
    Json(req): Json<LogInteractionChatRequest>,
) -> Response {
    let cmd = ChatTurnCommand {
        message: req.message,
        history: req.history,
        record: req.current_extraction_data.unwrap_or_default(),
    };

    let outcome = handlers.chat_handler.handle(cmd).await;
    let response: ChatTurnResponse = outcome.into();
    (StatusCode::OK, Json(response)).into_response()
}

/// GET / - Liveness probe
pub async fn liveness() -> Response {
    (
        StatusCode::OK,
        Json(json!({ "message": "HCP interaction logger backend is running." })),
    )
        .into_response()
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn handle_form_error(error: LogFormError) -> Response {
    match error {
        LogFormError::Validation { field, message } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse::validation(format!(
                "Validation failed for {}: {}",
                field, message
            ))),
        )
            .into_response(),
        LogFormError::Store(err) if err.is_unavailable() => {
            tracing::error!("Database unavailable: {}", err);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse::unavailable("Database connection unavailable.")),
            )
                .into_response()
        }
        LogFormError::Store(err) => {
            tracing::error!("Database error: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal(format!("Database error: {}", err))),
            )
                .into_response()
        }
        LogFormError::MissingAfterInsert(id) => {
            tracing::error!("Interaction {} missing on read-back after insert", id);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal(
                    "Failed to retrieve interaction after saving.",
                )),
            )
                .into_response()
        }
    }
}
