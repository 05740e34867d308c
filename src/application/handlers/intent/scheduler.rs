//! Intent priority scheduling and dispatch.
//!
//! Processes a turn's intents strictly in ascending priority order
//! (stable for ties) against one immutable turn snapshot. Every
//! handler invocation is isolated: a failure marks that intent failed
//! and processing continues with the rest.

use std::collections::HashMap;

use crate::domain::intent::{schedule, Intent, IntentCategory, IntentStatus};
use crate::domain::pricing::CostEstimate;
use crate::domain::recommendation::Recommendation;
use crate::domain::requirement::RequirementCategory;

/// Immutable snapshot of what this turn produced, shared by every
/// intent handler. Handlers never mutate each other's inputs.
#[derive(Debug, Clone, Default)]
pub struct TurnSnapshot {
    pub recommendation: Option<Recommendation>,
    pub estimate: Option<CostEstimate>,
    pub diagram_url: Option<String>,
    /// Requirement categories still unknown, for clarification replies.
    pub missing_categories: Vec<RequirementCategory>,
}

/// Result of processing one intent.
#[derive(Debug, Clone)]
pub struct IntentOutcome {
    pub category: IntentCategory,
    pub success: bool,
    pub content: Option<String>,
    pub recommendation: Option<Recommendation>,
    pub estimate: Option<CostEstimate>,
    pub diagram_url: Option<String>,
    pub error: Option<String>,
}

impl IntentOutcome {
    fn success(category: IntentCategory) -> Self {
        Self {
            category,
            success: true,
            content: None,
            recommendation: None,
            estimate: None,
            diagram_url: None,
            error: None,
        }
    }

    fn failure(category: IntentCategory, error: impl Into<String>) -> Self {
        Self {
            category,
            success: false,
            content: None,
            recommendation: None,
            estimate: None,
            diagram_url: None,
            error: Some(error.into()),
        }
    }
}

/// Per-intent handler failure. Recorded in the outcome map; never
/// propagated out of the scheduler.
#[derive(Debug, Clone, thiserror::Error)]
enum HandlerError {
    #[error("no architecture recommendation was produced this turn")]
    RecommendationUnavailable,

    #[error("pricing data is unavailable for the current recommendation")]
    PricingUnavailable,
}

/// Dispatches intents to their category handlers in priority order.
#[derive(Debug, Clone, Default)]
pub struct IntentScheduler;

impl IntentScheduler {
    pub fn new() -> Self {
        Self
    }

    /// Processes all intents, mutating each status along
    /// pending → processing → completed | failed, and returns the
    /// per-intent outcomes keyed by intent ID.
    pub fn process(
        &self,
        intents: &mut [Intent],
        snapshot: &TurnSnapshot,
    ) -> HashMap<crate::domain::foundation::IntentId, IntentOutcome> {
        schedule::sort_by_priority(intents);

        let mut outcomes = HashMap::new();
        for intent in intents.iter_mut() {
            if intent.transition_to(IntentStatus::Processing).is_err() {
                tracing::warn!(intent_id = %intent.id(), "intent not pending, skipping");
                continue;
            }

            let outcome = match self.dispatch(intent, snapshot) {
                Ok(outcome) => {
                    // Safe: processing → completed is always legal.
                    let _ = intent.transition_to(IntentStatus::Completed);
                    outcome
                }
                Err(err) => {
                    let _ = intent.transition_to(IntentStatus::Failed);
                    tracing::warn!(
                        intent_id = %intent.id(),
                        category = %intent.category(),
                        error = %err,
                        "intent handler failed"
                    );
                    IntentOutcome::failure(intent.category(), err.to_string())
                }
            };
            outcomes.insert(*intent.id(), outcome);
        }
        outcomes
    }

    fn dispatch(
        &self,
        intent: &Intent,
        snapshot: &TurnSnapshot,
    ) -> Result<IntentOutcome, HandlerError> {
        match intent.category() {
            IntentCategory::ArchitectureRequest | IntentCategory::Modification => {
                self.handle_architecture(intent.category(), snapshot)
            }
            IntentCategory::PricingQuery => self.handle_pricing(snapshot),
            IntentCategory::Clarification => Ok(self.handle_clarification(snapshot)),
        }
    }

    fn handle_architecture(
        &self,
        category: IntentCategory,
        snapshot: &TurnSnapshot,
    ) -> Result<IntentOutcome, HandlerError> {
        let recommendation = snapshot
            .recommendation
            .clone()
            .ok_or(HandlerError::RecommendationUnavailable)?;

        let mut outcome = IntentOutcome::success(category);
        outcome.diagram_url = snapshot
            .diagram_url
            .clone()
            .or_else(|| recommendation.diagram_url().map(str::to_string));
        outcome.recommendation = Some(recommendation);
        Ok(outcome)
    }

    fn handle_pricing(&self, snapshot: &TurnSnapshot) -> Result<IntentOutcome, HandlerError> {
        let estimate = snapshot
            .estimate
            .clone()
            .ok_or(HandlerError::PricingUnavailable)?;

        let mut outcome = IntentOutcome::success(IntentCategory::PricingQuery);
        outcome.estimate = Some(estimate);
        Ok(outcome)
    }

    fn handle_clarification(&self, snapshot: &TurnSnapshot) -> IntentOutcome {
        let mut outcome = IntentOutcome::success(IntentCategory::Clarification);
        outcome.content = Some(if snapshot.missing_categories.is_empty() {
            "Happy to clarify. Ask about any service in the recommendation, \
             its configuration, or the cost estimate."
                .to_string()
        } else {
            let missing: Vec<&str> = snapshot
                .missing_categories
                .iter()
                .map(|category| category.as_str())
                .collect();
            format!(
                "To refine the recommendation, could you tell me more about: {}?",
                missing.join(", ")
            )
        });
        outcome
    }
}
