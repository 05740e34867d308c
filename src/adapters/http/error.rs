//! Uniform HTTP error envelope.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Error payload returned by every endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
        }
    }

    /// Session missing or expired; the two are deliberately
    /// indistinguishable.
    pub fn not_found() -> (StatusCode, Json<Self>) {
        (
            StatusCode::NOT_FOUND,
            Json(Self::new("Conversation not found or expired", "not-found")),
        )
    }

    pub fn validation(message: impl Into<String>) -> (StatusCode, Json<Self>) {
        (
            StatusCode::BAD_REQUEST,
            Json(Self::new(message, "validation-error")),
        )
    }

    pub fn rate_limited() -> (StatusCode, Json<Self>) {
        (
            StatusCode::TOO_MANY_REQUESTS,
            Json(Self::new("Too many requests", "rate-limited")),
        )
    }

    pub fn internal() -> (StatusCode, Json<Self>) {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(Self::new("Internal error", "internal-error")),
        )
    }
}

/// Renders a not-found / validation / rate-limit / internal error.
pub fn error_response(pair: (StatusCode, Json<ErrorResponse>)) -> Response {
    pair.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_carries_code() {
        let (status, body) = ErrorResponse::not_found();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.0.code, "not-found");
    }
}
