//! HTTP adapter for interaction endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    ChatTurnResponse, ErrorResponse, InteractionResponse, LogInteractionChatRequest,
    LogInteractionFormRequest,
};
pub use handlers::InteractionHandlers;
pub use routes::interaction_routes;
