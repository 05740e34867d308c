//! Language model provider configuration.

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use super::error::ValidationError;

/// Which provider backs the language model port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    Anthropic,
    OpenAi,
}

/// Language model configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    #[serde(default = "default_provider")]
    pub provider: AiProvider,
    /// Provider API key.
    pub api_key: Secret<String>,
    /// Optional model override; the adapter default applies otherwise.
    #[serde(default)]
    pub model: Option<String>,
}

fn default_provider() -> AiProvider {
    AiProvider::Anthropic
}

impl AiConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.api_key.expose_secret().trim().is_empty() {
            return Err(ValidationError::invalid("ai.api_key", "must not be empty"));
        }
        Ok(())
    }
}
