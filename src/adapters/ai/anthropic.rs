//! Anthropic implementation of the language model port.
//!
//! Non-streaming messages API. Rate limits, auth failures, and
//! timeouts are mapped into the port's typed errors.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

use crate::ports::{CompletionRequest, LanguageModel, LanguageModelError};

/// Anthropic API version header value.
const ANTHROPIC_API_VERSION: &str = "2023-06-01";

/// Configuration for the Anthropic adapter.
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    api_key: Secret<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl AnthropicConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "claude-sonnet-4-20250514".to_string(),
            base_url: "https://api.anthropic.com".to_string(),
            timeout: Duration::from_secs(60),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Anthropic messages API adapter.
pub struct AnthropicModel {
    config: AnthropicConfig,
    client: Client,
}

impl AnthropicModel {
    pub fn new(config: AnthropicConfig) -> Result<Self, LanguageModelError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LanguageModelError::InvalidRequest(e.to_string()))?;
        Ok(Self { config, client })
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.config.base_url)
    }

    fn to_wire(&self, request: &CompletionRequest) -> AnthropicRequest {
        let mut user = request.user.clone();
        if request.json_response {
            user.push_str("\n\nRespond with a single JSON object and nothing else.");
        }
        AnthropicRequest {
            model: self.config.model.clone(),
            system: request.system.clone(),
            messages: vec![AnthropicMessage {
                role: "user".to_string(),
                content: user,
            }],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        }
    }

    async fn handle_status(&self, response: Response) -> Result<Response, LanguageModelError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        match status.as_u16() {
            401 => Err(LanguageModelError::AuthenticationFailed),
            429 => Err(LanguageModelError::RateLimited {
                retry_after_secs: parse_retry_after(&body),
            }),
            400 => Err(LanguageModelError::InvalidRequest(body)),
            500..=599 => Err(LanguageModelError::Unavailable(format!(
                "server error {}: {}",
                status, body
            ))),
            _ => Err(LanguageModelError::Network(format!(
                "unexpected status {}: {}",
                status, body
            ))),
        }
    }

    fn map_send_error(&self, error: reqwest::Error) -> LanguageModelError {
        if error.is_timeout() {
            LanguageModelError::Timeout {
                timeout_secs: self.config.timeout.as_secs() as u32,
            }
        } else if error.is_connect() {
            LanguageModelError::Network(format!("connection failed: {}", error))
        } else {
            LanguageModelError::Network(error.to_string())
        }
    }
}

#[async_trait]
impl LanguageModel for AnthropicModel {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LanguageModelError> {
        let wire = self.to_wire(&request);

        let response = self
            .client
            .post(self.messages_url())
            .header("x-api-key", self.config.api_key())
            .header("anthropic-version", ANTHROPIC_API_VERSION)
            .header("Content-Type", "application/json")
            .json(&wire)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let response = self.handle_status(response).await?;
        let parsed: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| LanguageModelError::MalformedJson(e.to_string()))?;

        let text = parsed
            .content
            .into_iter()
            .filter_map(|block| block.text)
            .collect::<Vec<String>>()
            .join("");
        Ok(text)
    }
}

/// Parses "try again in Xs" style hints out of an error body.
fn parse_retry_after(body: &str) -> u32 {
    const DEFAULT_RETRY_SECS: u32 = 60;

    let Ok(parsed) = serde_json::from_str::<serde_json::Value>(body) else {
        return DEFAULT_RETRY_SECS;
    };
    let Some(message) = parsed
        .get("error")
        .and_then(|e| e.get("message"))
        .and_then(|m| m.as_str())
    else {
        return DEFAULT_RETRY_SECS;
    };
    let Some(idx) = message.find("try again in ") else {
        return DEFAULT_RETRY_SECS;
    };
    let rest = &message[idx + "try again in ".len()..];
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(DEFAULT_RETRY_SECS)
}

#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    system: String,
    messages: Vec<AnthropicMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    #[serde(default)]
    content: Vec<AnthropicContentBlock>,
}

#[derive(Debug, Deserialize)]
struct AnthropicContentBlock {
    #[serde(default)]
    text: Option<String>,
}
