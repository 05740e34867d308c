//! In-memory price cache and static price source.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::Timestamp;
use crate::domain::pricing::PriceQuote;
use crate::ports::{CachedQuote, PriceCache, PriceQuery, PriceSource, PricingError};

/// HashMap-backed [`PriceCache`].
#[derive(Default)]
pub struct InMemoryPriceCache {
    entries: Arc<RwLock<HashMap<String, CachedQuote>>>,
}

impl InMemoryPriceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an entry with an explicit write timestamp (test helper
    /// for freshness-window cases).
    pub async fn seed(&self, query: &PriceQuery, quote: PriceQuote, cached_at: Timestamp) {
        self.entries
            .write()
            .await
            .insert(query.cache_key(), CachedQuote { quote, cached_at });
    }
}

#[async_trait]
impl PriceCache for InMemoryPriceCache {
    async fn get(&self, query: &PriceQuery) -> Result<Option<CachedQuote>, PricingError> {
        Ok(self.entries.read().await.get(&query.cache_key()).cloned())
    }

    async fn put(&self, query: &PriceQuery, quote: &PriceQuote) -> Result<(), PricingError> {
        self.entries.write().await.insert(
            query.cache_key(),
            CachedQuote {
                quote: quote.clone(),
                cached_at: Timestamp::now(),
            },
        );
        Ok(())
    }
}

/// Fixed-table [`PriceSource`], keyed by service code.
#[derive(Default)]
pub struct StaticPriceSource {
    prices: HashMap<String, PriceQuote>,
}

impl StaticPriceSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_price(mut self, service_code: &str, quote: PriceQuote) -> Self {
        self.prices.insert(service_code.to_string(), quote);
        self
    }
}

#[async_trait]
impl PriceSource for StaticPriceSource {
    async fn lookup(&self, query: &PriceQuery) -> Result<Option<PriceQuote>, PricingError> {
        Ok(self.prices.get(&query.service_code).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn cache_round_trip() {
        let cache = InMemoryPriceCache::new();
        let query = PriceQuery::new("EC2").with_instance_type("t3.medium");
        let quote = PriceQuote::new(Decimal::new(10, 2), "USD", "per hour");

        assert!(cache.get(&query).await.unwrap().is_none());
        cache.put(&query, &quote).await.unwrap();
        assert_eq!(cache.get(&query).await.unwrap().unwrap().quote, quote);
    }

    #[tokio::test]
    async fn static_source_serves_known_codes_only() {
        let source = StaticPriceSource::new()
            .with_price("RDS", PriceQuote::new(Decimal::from(120), "USD", "per month"));

        assert!(source
            .lookup(&PriceQuery::new("RDS"))
            .await
            .unwrap()
            .is_some());
        assert!(source
            .lookup(&PriceQuery::new("EC2"))
            .await
            .unwrap()
            .is_none());
    }
}
