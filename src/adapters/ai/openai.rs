//! OpenAI implementation of the language model port.
//!
//! Non-streaming chat completions. JSON mode uses the native
//! `response_format` switch.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

use crate::ports::{CompletionRequest, LanguageModel, LanguageModelError};

/// Configuration for the OpenAI adapter.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    api_key: Secret<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl OpenAiConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "gpt-4-turbo".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
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

/// OpenAI chat completions adapter.
pub struct OpenAiModel {
    config: OpenAiConfig,
    client: Client,
}

impl OpenAiModel {
    pub fn new(config: OpenAiConfig) -> Result<Self, LanguageModelError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LanguageModelError::InvalidRequest(e.to_string()))?;
        Ok(Self { config, client })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    fn to_wire(&self, request: &CompletionRequest) -> OpenAiRequest {
        OpenAiRequest {
            model: self.config.model.clone(),
            messages: vec![
                OpenAiMessage {
                    role: "system".to_string(),
                    content: request.system.clone(),
                },
                OpenAiMessage {
                    role: "user".to_string(),
                    content: request.user.clone(),
                },
            ],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            response_format: request
                .json_response
                .then(|| ResponseFormat {
                    format_type: "json_object".to_string(),
                }),
        }
    }

    async fn handle_status(&self, response: Response) -> Result<Response, LanguageModelError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);
        let body = response.text().await.unwrap_or_default();

        match status.as_u16() {
            401 => Err(LanguageModelError::AuthenticationFailed),
            429 => Err(LanguageModelError::RateLimited {
                retry_after_secs: retry_after,
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
impl LanguageModel for OpenAiModel {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LanguageModelError> {
        let wire = self.to_wire(&request);

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(self.config.api_key())
            .header("Content-Type", "application/json")
            .json(&wire)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let response = self.handle_status(response).await?;
        let parsed: OpenAiResponse = response
            .json()
            .await
            .map_err(|e| LanguageModelError::MalformedJson(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| LanguageModelError::MalformedJson("response had no choices".into()))
    }
}

#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    #[serde(default)]
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}
