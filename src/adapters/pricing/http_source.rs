//! HTTP implementation of the remote price source.
//!
//! Queries a pricing endpoint that answers
//! `GET {base}/prices?service={code}[&instance_type=..][&region=..]`
//! with `{"unit_price": "0.104", "currency": "USD", "unit": "per hour"}`,
//! or 404 when no price exists for the query.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::pricing::PriceQuote;
use crate::ports::{PriceQuery, PriceSource, PricingError};

/// Configuration for the HTTP price source.
#[derive(Debug, Clone)]
pub struct HttpPriceSourceConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl HttpPriceSourceConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Deserialize)]
struct PriceResponse {
    unit_price: Decimal,
    currency: String,
    unit: String,
}

/// HTTP [`PriceSource`].
pub struct HttpPriceSource {
    config: HttpPriceSourceConfig,
    client: Client,
}

impl HttpPriceSource {
    pub fn new(config: HttpPriceSourceConfig) -> Result<Self, PricingError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PricingError::Unavailable(e.to_string()))?;
        Ok(Self { config, client })
    }

    fn prices_url(&self) -> String {
        format!("{}/prices", self.config.base_url)
    }
}

#[async_trait]
impl PriceSource for HttpPriceSource {
    async fn lookup(&self, query: &PriceQuery) -> Result<Option<PriceQuote>, PricingError> {
        let mut params = vec![("service", query.service_code.clone())];
        if let Some(instance_type) = &query.instance_type {
            params.push(("instance_type", instance_type.clone()));
        }
        if let Some(region) = &query.region {
            params.push(("region", region.clone()));
        }

        let response = self
            .client
            .get(self.prices_url())
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PricingError::Network("price lookup timed out".into())
                } else {
                    PricingError::Network(e.to_string())
                }
            })?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(PricingError::Unavailable(format!(
                "price endpoint returned {}",
                response.status()
            )));
        }

        let parsed: PriceResponse = response
            .json()
            .await
            .map_err(|e| PricingError::Malformed(e.to_string()))?;

        Ok(Some(PriceQuote::new(
            parsed.unit_price,
            parsed.currency,
            parsed.unit,
        )))
    }
}
