//! Request limit configuration.

use serde::Deserialize;

use super::error::ValidationError;

/// Rate limit knobs for the transport surface.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Messages accepted per session per minute.
    #[serde(default = "default_messages_per_minute")]
    pub messages_per_minute: u32,
}

fn default_messages_per_minute() -> u32 {
    30
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            messages_per_minute: default_messages_per_minute(),
        }
    }
}

impl LimitsConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.messages_per_minute == 0 {
            return Err(ValidationError::invalid(
                "limits.messages_per_minute",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}
