//! Language model port.
//!
//! One call shape: system instructions plus a user payload in, text
//! out, with an optional JSON-only mode. Providers translate their
//! wire formats behind this trait; callers never see provider errors
//! raw.

use async_trait::async_trait;
use serde_json::Value;

/// A completion request.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// System instructions guiding the model.
    pub system: String,
    /// The user payload (prompt body).
    pub user: String,
    /// When true, the model must answer with a single JSON object.
    pub json_response: bool,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
}

impl CompletionRequest {
    /// Creates a request with the component defaults (2000 tokens,
    /// low temperature for structured extraction).
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            json_response: false,
            max_tokens: 2000,
            temperature: 0.3,
        }
    }

    /// Requires a JSON object response.
    pub fn expecting_json(mut self) -> Self {
        self.json_response = true;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Language model errors. Components catch these and degrade; they
/// are never surfaced to the transport layer directly.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LanguageModelError {
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u32 },

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u32 },

    #[error("provider unavailable: {0}")]
    Unavailable(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("response is not valid JSON: {0}")]
    MalformedJson(String),
}

/// Stateless text → structured-text capability.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Generates one completion.
    async fn complete(&self, request: CompletionRequest) -> Result<String, LanguageModelError>;

    /// Generates a completion and parses it as a JSON object.
    ///
    /// Code fences around the object are tolerated and stripped.
    async fn complete_json(
        &self,
        request: CompletionRequest,
    ) -> Result<Value, LanguageModelError> {
        let text = self.complete(request.expecting_json()).await?;
        let body = strip_code_fences(&text);
        serde_json::from_str(body).map_err(|e| {
            LanguageModelError::MalformedJson(format!("{e}: {}", truncate_for_log(body)))
        })
    }
}

/// Strips a leading/trailing Markdown code fence, with or without a
/// language tag, leaving bare JSON untouched.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop an optional language tag on the fence line.
    let rest = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

fn truncate_for_log(s: &str) -> String {
    const MAX: usize = 120;
    if s.chars().count() <= MAX {
        s.to_string()
    } else {
        let clipped: String = s.chars().take(MAX).collect();
        format!("{clipped}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_handles_bare_json() {
        assert_eq!(strip_code_fences(r#"{"a": 1}"#), r#"{"a": 1}"#);
    }

    #[test]
    fn strip_handles_plain_fence() {
        assert_eq!(strip_code_fences("```\n{\"a\": 1}\n```"), "{\"a\": 1}");
    }

    #[test]
    fn strip_handles_json_tagged_fence() {
        assert_eq!(strip_code_fences("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
    }

    #[test]
    fn strip_tolerates_surrounding_whitespace() {
        assert_eq!(
            strip_code_fences("  ```json\n{\"a\": 1}\n```  "),
            "{\"a\": 1}"
        );
    }

    struct EchoModel(String);

    #[async_trait]
    impl LanguageModel for EchoModel {
        async fn complete(
            &self,
            _request: CompletionRequest,
        ) -> Result<String, LanguageModelError> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn complete_json_parses_fenced_object() {
        let model = EchoModel("```json\n{\"intents\": []}\n```".to_string());
        let value = model
            .complete_json(CompletionRequest::new("sys", "user"))
            .await
            .unwrap();
        assert!(value["intents"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn complete_json_rejects_prose() {
        let model = EchoModel("I could not produce JSON".to_string());
        let err = model
            .complete_json(CompletionRequest::new("sys", "user"))
            .await
            .unwrap_err();
        assert!(matches!(err, LanguageModelError::MalformedJson(_)));
    }
}
