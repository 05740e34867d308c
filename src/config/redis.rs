//! Redis configuration.

use serde::Deserialize;

use super::error::ValidationError;

/// Redis connection configuration (price cache).
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    /// Connection URL (redis://...).
    pub url: String,
}

impl RedisConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.url.starts_with("redis://") && !self.url.starts_with("rediss://") {
            return Err(ValidationError::invalid(
                "redis.url",
                "must start with redis:// or rediss://",
            ));
        }
        Ok(())
    }
}
