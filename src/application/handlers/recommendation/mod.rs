//! Recommendation generation pipeline.

mod engine;

pub use engine::{RecommendationEngine, RecommendationError};
