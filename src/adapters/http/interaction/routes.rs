//! HTTP routes for interaction endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{liveness, log_interaction_chat, log_interaction_form, InteractionHandlers};

/// Creates the interaction router with all endpoints.
pub fn interaction_routes(handlers: InteractionHandlers) -> Router {
    Router::new()
        .route("/", get(liveness))
        .route("/api/log_interaction_form", post(log_interaction_form))
        .route("/api/log_interaction_chat", post(log_interaction_chat))
        .with_state(handlers)
}
