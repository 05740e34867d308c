//! Pricing source configuration.

use serde::Deserialize;

use super::error::ValidationError;

/// Pricing lookup configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PricingConfig {
    /// Base URL of the remote price endpoint.
    pub base_url: String,
    /// Cache freshness window in hours.
    #[serde(default = "default_freshness_hours")]
    pub freshness_hours: i64,
    /// Cache entry TTL in hours; kept beyond the freshness window so
    /// stale entries remain available as a remote-failure fallback.
    #[serde(default = "default_ttl_hours")]
    pub cache_ttl_hours: u64,
}

fn default_freshness_hours() -> i64 {
    24
}

fn default_ttl_hours() -> u64 {
    72
}

impl PricingConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::invalid(
                "pricing.base_url",
                "must be an http(s) URL",
            ));
        }
        if self.freshness_hours <= 0 {
            return Err(ValidationError::invalid(
                "pricing.freshness_hours",
                "must be positive",
            ));
        }
        Ok(())
    }
}
