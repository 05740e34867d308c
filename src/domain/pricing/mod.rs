//! Pricing domain: unit price quotes and monthly cost estimates.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{EstimateId, RecommendationId, Timestamp};

/// Hours used to scale a per-hour unit price to a monthly figure.
pub const HOURS_PER_MONTH: u32 = 730;

/// A unit price for one service, as returned by the price source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub unit_price: Decimal,
    /// ISO currency code (e.g. "USD").
    pub currency: String,
    /// Billing unit (e.g. "per hour", "per GB-month").
    pub unit: String,
}

impl PriceQuote {
    pub fn new(unit_price: Decimal, currency: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            unit_price,
            currency: currency.into(),
            unit: unit.into(),
        }
    }

    /// Scales the quote to an estimated monthly cost.
    ///
    /// Per-hour units are multiplied by [`HOURS_PER_MONTH`]; any other
    /// unit is taken as already monthly.
    pub fn monthly_cost(&self) -> Decimal {
        if self.unit.contains("hour") {
            self.unit_price * Decimal::from(HOURS_PER_MONTH)
        } else {
            self.unit_price
        }
    }
}

/// Where the figures in an estimate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceDataSource {
    Cache,
    Remote,
}

/// One component of a service's cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostComponent {
    /// Component kind (e.g. "compute", "storage", "data_transfer").
    pub component_type: String,
    pub cost: Decimal,
    pub unit: String,
}

/// Monthly cost for a single service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceCost {
    pub service_name: String,
    pub monthly_cost: Decimal,
    pub components: Vec<CostComponent>,
}

impl ServiceCost {
    pub fn new(service_name: impl Into<String>, monthly_cost: Decimal) -> Self {
        Self {
            service_name: service_name.into(),
            monthly_cost,
            components: Vec::new(),
        }
    }

    pub fn with_component(mut self, component: CostComponent) -> Self {
        self.components.push(component);
        self
    }
}

/// A cost estimate for one recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostEstimate {
    id: EstimateId,
    recommendation_id: RecommendationId,
    calculated_at: Timestamp,
    total_monthly: Decimal,
    breakdown: Vec<ServiceCost>,
    assumptions: serde_json::Value,
    source: PriceDataSource,
    /// Timestamp of the oldest price data used.
    freshness: Timestamp,
}

impl CostEstimate {
    /// Creates an estimate; the total is derived from the breakdown.
    pub fn new(
        recommendation_id: RecommendationId,
        breakdown: Vec<ServiceCost>,
        assumptions: serde_json::Value,
        source: PriceDataSource,
        freshness: Timestamp,
    ) -> Self {
        let total_monthly = breakdown.iter().map(|item| item.monthly_cost).sum();
        Self {
            id: EstimateId::new(),
            recommendation_id,
            calculated_at: Timestamp::now(),
            total_monthly,
            breakdown,
            assumptions,
            source,
            freshness,
        }
    }

    pub fn id(&self) -> &EstimateId {
        &self.id
    }

    pub fn recommendation_id(&self) -> &RecommendationId {
        &self.recommendation_id
    }

    pub fn calculated_at(&self) -> &Timestamp {
        &self.calculated_at
    }

    pub fn total_monthly(&self) -> Decimal {
        self.total_monthly
    }

    pub fn breakdown(&self) -> &[ServiceCost] {
        &self.breakdown
    }

    pub fn assumptions(&self) -> &serde_json::Value {
        &self.assumptions
    }

    pub fn source(&self) -> PriceDataSource {
        self.source
    }

    pub fn freshness(&self) -> &Timestamp {
        &self.freshness
    }
}
