//! Monthly cost estimation for a recommendation.
//!
//! Cache-then-remote per service: a fresh cached quote is used as-is,
//! otherwise the remote source is consulted and the cache refreshed
//! best-effort. On remote failure a stale cached quote is better than
//! nothing; a service with no resolvable price is skipped with a
//! warning and never fails the estimate.

use std::sync::Arc;

use chrono::Duration;

use crate::domain::pricing::{
    CostComponent, CostEstimate, PriceDataSource, PriceQuote, ServiceCost,
};
use crate::domain::foundation::Timestamp;
use crate::domain::recommendation::Recommendation;
use crate::ports::{PriceCache, PriceQuery, PriceSource};

/// Default freshness window for cached prices.
pub const DEFAULT_FRESHNESS_HOURS: i64 = 24;

/// Resolves per-service unit prices into one monthly estimate.
pub struct CostEstimator {
    cache: Arc<dyn PriceCache>,
    source: Arc<dyn PriceSource>,
    freshness: Duration,
}

impl CostEstimator {
    pub fn new(cache: Arc<dyn PriceCache>, source: Arc<dyn PriceSource>) -> Self {
        Self {
            cache,
            source,
            freshness: Duration::hours(DEFAULT_FRESHNESS_HOURS),
        }
    }

    /// Overrides the cache freshness window.
    pub fn with_freshness(mut self, freshness: Duration) -> Self {
        self.freshness = freshness;
        self
    }

    /// Estimates the monthly cost of a recommendation.
    ///
    /// Returns `None` when no service could be priced at all.
    pub async fn estimate(
        &self,
        recommendation: &Recommendation,
        assumptions: serde_json::Value,
    ) -> Option<CostEstimate> {
        let mut breakdown = Vec::new();
        let mut source = PriceDataSource::Cache;
        let mut freshness = Timestamp::now();

        for service in recommendation.services() {
            let query = self.build_query(recommendation, &service.name, service.region.as_deref());
            match self.resolve_quote(&query).await {
                Some(resolved) => {
                    if resolved.from_remote {
                        source = PriceDataSource::Remote;
                    }
                    if resolved.as_of.is_before(&freshness) {
                        freshness = resolved.as_of;
                    }
                    let monthly = resolved.quote.monthly_cost();
                    breakdown.push(
                        ServiceCost::new(service.name.clone(), monthly).with_component(
                            CostComponent {
                                component_type: service.category.as_str().to_string(),
                                cost: monthly,
                                unit: resolved.quote.unit.clone(),
                            },
                        ),
                    );
                }
                None => {
                    tracing::warn!(
                        service = %service.name,
                        "no price resolvable, skipping service in estimate"
                    );
                }
            }
        }

        if breakdown.is_empty() {
            return None;
        }

        Some(CostEstimate::new(
            *recommendation.id(),
            breakdown,
            assumptions,
            source,
            freshness,
        ))
    }

    fn build_query(
        &self,
        recommendation: &Recommendation,
        service_name: &str,
        region: Option<&str>,
    ) -> PriceQuery {
        let mut query = PriceQuery::new(service_name);
        if let Some(config) = recommendation
            .configs_for(service_name)
            .into_iter()
            .find(|config| config.config_type == "instance_type")
        {
            query = query.with_instance_type(config.value.clone());
        }
        if let Some(region) = region {
            query = query.with_region(region);
        }
        query
    }

    async fn resolve_quote(&self, query: &PriceQuery) -> Option<ResolvedQuote> {
        // Cache read errors count as misses.
        let cached = match self.cache.get(query).await {
            Ok(cached) => cached,
            Err(err) => {
                tracing::warn!(key = %query.cache_key(), error = %err, "price cache read failed");
                None
            }
        };

        if let Some(entry) = &cached {
            let age = Timestamp::now().duration_since(&entry.cached_at);
            if age <= self.freshness {
                return Some(ResolvedQuote {
                    quote: entry.quote.clone(),
                    as_of: entry.cached_at,
                    from_remote: false,
                });
            }
        }

        match self.source.lookup(query).await {
            Ok(Some(quote)) => {
                if let Err(err) = self.cache.put(query, &quote).await {
                    tracing::warn!(key = %query.cache_key(), error = %err, "price cache write failed");
                }
                Some(ResolvedQuote {
                    quote,
                    as_of: Timestamp::now(),
                    from_remote: true,
                })
            }
            Ok(None) => None,
            Err(err) => {
                tracing::warn!(
                    key = %query.cache_key(),
                    error = %err,
                    "remote price lookup failed, falling back to stale cache"
                );
                cached.map(|entry| ResolvedQuote {
                    quote: entry.quote,
                    as_of: entry.cached_at,
                    from_remote: false,
                })
            }
        }
    }
}

struct ResolvedQuote {
    quote: PriceQuote,
    as_of: Timestamp,
    from_remote: bool,
}
