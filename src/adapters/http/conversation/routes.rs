//! Route table for conversation endpoints.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{create_conversation, get_conversation, send_message, ConversationHandlers};

/// Builds the conversation router.
pub fn conversation_router(handlers: ConversationHandlers) -> Router {
    Router::new()
        .route("/conversations", post(create_conversation))
        .route("/conversations/:id", get(get_conversation))
        .route("/conversations/:id/messages", post(send_message))
        .with_state(handlers)
}
