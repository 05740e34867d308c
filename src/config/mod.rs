//! Application configuration.
//!
//! Type-safe configuration loaded from environment variables via the
//! `config` and `dotenvy` crates. Variables use the `ARCHWAY` prefix
//! with `__` separating nested sections:
//!
//! - `ARCHWAY__SERVER__PORT=8080` → `server.port`
//! - `ARCHWAY__DATABASE__URL=postgresql://...` → `database.url`
//! - `ARCHWAY__AI__PROVIDER=anthropic` → `ai.provider`

mod ai;
mod database;
mod diagram;
mod error;
mod limits;
mod pricing;
mod redis;
mod server;

pub use ai::{AiConfig, AiProvider};
pub use database::DatabaseConfig;
pub use diagram::DiagramConfig;
pub use error::{ConfigError, ValidationError};
pub use limits::LimitsConfig;
pub use pricing::PricingConfig;
pub use redis::RedisConfig;
pub use server::ServerConfig;

use serde::Deserialize;

/// Root application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub ai: AiConfig,
    pub pricing: PricingConfig,
    #[serde(default)]
    pub diagram: DiagramConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
}

impl AppConfig {
    /// Loads configuration from the environment (and a `.env` file in
    /// development).
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("ARCHWAY")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validates every section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.redis.validate()?;
        self.ai.validate()?;
        self.pricing.validate()?;
        self.diagram.validate()?;
        self.limits.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::Secret;

    fn base_config() -> AppConfig {
        AppConfig {
            server: ServerConfig::default(),
            database: DatabaseConfig {
                url: "postgresql://localhost/archway".to_string(),
                max_connections: 5,
            },
            redis: RedisConfig {
                url: "redis://localhost:6379".to_string(),
            },
            ai: AiConfig {
                provider: AiProvider::Anthropic,
                api_key: Secret::new("key".to_string()),
                model: None,
            },
            pricing: PricingConfig {
                base_url: "https://pricing.example.com".to_string(),
                freshness_hours: 24,
                cache_ttl_hours: 72,
            },
            diagram: DiagramConfig::default(),
            limits: LimitsConfig::default(),
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn bad_database_url_fails() {
        let mut config = base_config();
        config.database.url = "mysql://nope".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_api_key_fails() {
        let mut config = base_config();
        config.ai.api_key = Secret::new("  ".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_rate_limit_fails() {
        let mut config = base_config();
        config.limits.messages_per_minute = 0;
        assert!(config.validate().is_err());
    }
}
