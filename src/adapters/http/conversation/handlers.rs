//! HTTP handlers for conversation endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::adapters::http::error::{error_response, ErrorResponse};
use crate::adapters::http::rate_limit::FixedWindowLimiter;
use crate::adapters::http::turn_locks::TurnLocks;
use crate::application::handlers::conversation::ConversationOrchestrator;
use crate::application::handlers::session::{CreateSessionHandler, SessionLifecycle};
use crate::domain::conversation::Message;
use crate::domain::foundation::SessionId;
use crate::ports::MessageStore;

use super::dto::{
    ConversationResponse, CreateConversationResponse, MessageResponse, SendMessageRequest,
};

/// Shared state for conversation endpoints.
#[derive(Clone)]
pub struct ConversationHandlers {
    create_handler: Arc<CreateSessionHandler>,
    lifecycle: Arc<SessionLifecycle>,
    orchestrator: Arc<ConversationOrchestrator>,
    messages: Arc<dyn MessageStore>,
    rate_limiter: Arc<FixedWindowLimiter>,
    turn_locks: TurnLocks,
}

impl ConversationHandlers {
    pub fn new(
        create_handler: Arc<CreateSessionHandler>,
        lifecycle: Arc<SessionLifecycle>,
        orchestrator: Arc<ConversationOrchestrator>,
        messages: Arc<dyn MessageStore>,
        rate_limiter: Arc<FixedWindowLimiter>,
    ) -> Self {
        Self {
            create_handler,
            lifecycle,
            orchestrator,
            messages,
            rate_limiter,
            turn_locks: TurnLocks::new(),
        }
    }
}

/// POST /conversations - start a new conversation session.
pub async fn create_conversation(State(handlers): State<ConversationHandlers>) -> Response {
    match handlers.create_handler.handle().await {
        Ok(session) => (
            StatusCode::CREATED,
            Json(CreateConversationResponse::from(&session)),
        )
            .into_response(),
        Err(err) => {
            tracing::error!(error = %err, "session creation failed");
            error_response(ErrorResponse::internal())
        }
    }
}

/// GET /conversations/:id - resume a session.
pub async fn get_conversation(
    State(handlers): State<ConversationHandlers>,
    Path(session_id): Path<String>,
) -> Response {
    let Ok(session_id) = session_id.parse::<SessionId>() else {
        return error_response(ErrorResponse::validation("Invalid session ID"));
    };

    match handlers.lifecycle.resume(&session_id).await {
        Ok(Some(session)) => {
            (StatusCode::OK, Json(ConversationResponse::from(&session))).into_response()
        }
        Ok(None) => error_response(ErrorResponse::not_found()),
        Err(err) => {
            tracing::error!(error = %err, "session resume failed");
            error_response(ErrorResponse::internal())
        }
    }
}

/// POST /conversations/:id/messages - one full conversation turn.
pub async fn send_message(
    State(handlers): State<ConversationHandlers>,
    Path(session_id): Path<String>,
    Json(request): Json<SendMessageRequest>,
) -> Response {
    let Ok(session_id) = session_id.parse::<SessionId>() else {
        return error_response(ErrorResponse::validation("Invalid session ID"));
    };
    let content = match request.validated_content() {
        Ok(content) => content,
        Err(message) => return error_response(ErrorResponse::validation(message)),
    };

    if !handlers.rate_limiter.allow(&session_id.to_string()).await {
        return error_response(ErrorResponse::rate_limited());
    }

    // One in-flight turn per session: context merges must apply in
    // arrival order.
    let _turn_guard = handlers.turn_locks.acquire(session_id).await;

    match handlers.lifecycle.resume(&session_id).await {
        Ok(Some(_session)) => {}
        Ok(None) => return error_response(ErrorResponse::not_found()),
        Err(err) => {
            tracing::error!(error = %err, "session resume failed");
            return error_response(ErrorResponse::internal());
        }
    }

    let user_message = Message::user(session_id, content.clone());
    if let Err(err) = handlers.messages.create(&user_message).await {
        tracing::error!(error = %err, "failed to persist user message");
        return error_response(ErrorResponse::internal());
    }

    let reply = match handlers
        .orchestrator
        .process_message(session_id, *user_message.id(), &content)
        .await
    {
        Ok(reply) => reply,
        Err(err) => {
            tracing::error!(error = %err, "turn failed");
            return error_response(ErrorResponse::internal());
        }
    };

    let assistant_message = Message::assistant(session_id, reply.content.clone())
        .with_metadata(reply.metadata.clone());
    if let Err(err) = handlers.messages.create(&assistant_message).await {
        tracing::error!(error = %err, "failed to persist assistant message");
        return error_response(ErrorResponse::internal());
    }

    (
        StatusCode::OK,
        Json(MessageResponse::from_turn(&assistant_message, &reply)),
    )
        .into_response()
}
