//! PostgreSQL configuration.

use serde::Deserialize;

use super::error::ValidationError;

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Connection URL (postgresql://...).
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

impl DatabaseConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.url.starts_with("postgresql://") && !self.url.starts_with("postgres://") {
            return Err(ValidationError::invalid(
                "database.url",
                "must start with postgresql:// or postgres://",
            ));
        }
        if self.max_connections == 0 {
            return Err(ValidationError::invalid(
                "database.max_connections",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}
