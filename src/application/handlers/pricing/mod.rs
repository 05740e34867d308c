//! Pricing estimation pipeline.

mod estimator;

pub use estimator::{CostEstimator, DEFAULT_FRESHNESS_HOURS};
