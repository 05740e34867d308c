//! Pricing ports: remote price source and price cache.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;
use crate::domain::pricing::PriceQuote;

/// Lookup key for a unit price.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PriceQuery {
    /// Service code (e.g. "EC2").
    pub service_code: String,
    pub instance_type: Option<String>,
    pub region: Option<String>,
}

impl PriceQuery {
    pub fn new(service_code: impl Into<String>) -> Self {
        Self {
            service_code: service_code.into(),
            instance_type: None,
            region: None,
        }
    }

    pub fn with_instance_type(mut self, instance_type: impl Into<String>) -> Self {
        self.instance_type = Some(instance_type.into());
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Stable cache key: `pricing:{service}[:{instance}][:{region}]`.
    pub fn cache_key(&self) -> String {
        let mut key = format!("pricing:{}", self.service_code);
        if let Some(instance_type) = &self.instance_type {
            key.push(':');
            key.push_str(instance_type);
        }
        if let Some(region) = &self.region {
            key.push(':');
            key.push_str(region);
        }
        key
    }
}

/// A cached quote with its write timestamp, for freshness decisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedQuote {
    pub quote: PriceQuote,
    pub cached_at: Timestamp,
}

/// Pricing errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PricingError {
    #[error("price source unavailable: {0}")]
    Unavailable(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("malformed price data: {0}")]
    Malformed(String),

    #[error("cache error: {0}")]
    Cache(String),
}

/// Remote unit-price lookup.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Looks up a unit price; `None` when the source has no price for
    /// the query.
    async fn lookup(&self, query: &PriceQuery) -> Result<Option<PriceQuote>, PricingError>;
}

/// Price cache with TTL-managed entries.
///
/// Reads failing at the backend are reported as errors so the caller
/// can treat them as misses; writes are best-effort.
#[async_trait]
pub trait PriceCache: Send + Sync {
    async fn get(&self, query: &PriceQuery) -> Result<Option<CachedQuote>, PricingError>;

    async fn put(&self, query: &PriceQuery, quote: &PriceQuote) -> Result<(), PricingError>;
}
