//! Redis implementation of the price cache.
//!
//! Entries are JSON payloads written with a TTL slightly beyond the
//! estimator's freshness window, so stale-but-present entries remain
//! available as a fallback when the remote source is down.

use async_trait::async_trait;
use redis::AsyncCommands;

use crate::ports::{CachedQuote, PriceCache, PriceQuery, PricingError};
use crate::domain::foundation::Timestamp;
use crate::domain::pricing::PriceQuote;

/// Redis-backed [`PriceCache`].
#[derive(Clone)]
pub struct RedisPriceCache {
    client: redis::Client,
    ttl_secs: usize,
}

impl RedisPriceCache {
    /// Creates a cache with the given entry TTL.
    pub fn new(client: redis::Client, ttl_secs: usize) -> Self {
        Self { client, ttl_secs }
    }
}

#[async_trait]
impl PriceCache for RedisPriceCache {
    async fn get(&self, query: &PriceQuery) -> Result<Option<CachedQuote>, PricingError> {
        let mut conn = self
            .client
            .get_async_connection()
            .await
            .map_err(|e| PricingError::Cache(format!("redis connect: {}", e)))?;

        let raw: Option<String> = conn
            .get(query.cache_key())
            .await
            .map_err(|e| PricingError::Cache(format!("redis get: {}", e)))?;

        match raw {
            Some(json) => serde_json::from_str(&json)
                .map(Some)
                .map_err(|e| PricingError::Cache(format!("corrupt cache entry: {}", e))),
            None => Ok(None),
        }
    }

    async fn put(&self, query: &PriceQuery, quote: &PriceQuote) -> Result<(), PricingError> {
        let entry = CachedQuote {
            quote: quote.clone(),
            cached_at: Timestamp::now(),
        };
        let json = serde_json::to_string(&entry)
            .map_err(|e| PricingError::Cache(format!("serialize cache entry: {}", e)))?;

        let mut conn = self
            .client
            .get_async_connection()
            .await
            .map_err(|e| PricingError::Cache(format!("redis connect: {}", e)))?;

        conn.set_ex(query.cache_key(), json, self.ttl_secs as u64)
            .await
            .map_err(|e| PricingError::Cache(format!("redis set: {}", e)))
    }
}
