//! Aggregation of per-intent results into one reply structure.

use std::collections::HashMap;

use serde_json::json;

use crate::domain::foundation::IntentId;
use crate::domain::intent::Intent;
use crate::domain::pricing::CostEstimate;
use crate::domain::recommendation::Recommendation;

use super::scheduler::IntentOutcome;

/// One turn's aggregated reply data, before formatting.
#[derive(Debug, Clone, Default)]
pub struct AggregatedReply {
    /// Free-text parts (clarifications), in priority order.
    pub content_parts: Vec<String>,
    pub recommendations: Vec<Recommendation>,
    pub pricing: Option<CostEstimate>,
    pub diagrams: Vec<String>,
    /// Diagnostics: every intent's result, including failures.
    pub metadata: serde_json::Value,
}

/// Merges per-intent outcomes into one [`AggregatedReply`].
#[derive(Debug, Clone, Default)]
pub struct ResultAggregator;

impl ResultAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Walks intents in priority order (not insertion order) so the
    /// reply presents architecture before pricing before
    /// clarification, regardless of classification order jitter.
    /// Only successful outcomes contribute content; failed ones stay
    /// visible in `metadata.intent_results` for diagnostics.
    pub fn aggregate(
        &self,
        outcomes: &HashMap<IntentId, IntentOutcome>,
        intents: &[Intent],
    ) -> AggregatedReply {
        let mut ordered: Vec<&Intent> = intents.iter().collect();
        ordered.sort_by_key(|intent| intent.priority());

        let mut reply = AggregatedReply::default();
        let mut intent_results = serde_json::Map::new();

        for intent in ordered {
            let Some(outcome) = outcomes.get(intent.id()) else {
                continue;
            };

            intent_results.insert(
                intent.id().to_string(),
                json!({
                    "category": intent.category().as_str(),
                    "success": outcome.success,
                    "error": outcome.error,
                }),
            );

            if !outcome.success {
                continue;
            }

            if let Some(recommendation) = &outcome.recommendation {
                reply.recommendations.push(recommendation.clone());
            }
            if let Some(estimate) = &outcome.estimate {
                reply.pricing = Some(estimate.clone());
            }
            if let Some(url) = &outcome.diagram_url {
                if !reply.diagrams.contains(url) {
                    reply.diagrams.push(url.clone());
                }
            }
            if let Some(content) = &outcome.content {
                reply.content_parts.push(content.clone());
            }
        }

        reply.metadata = json!({ "intent_results": intent_results });
        reply
    }
}
