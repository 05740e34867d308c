//! Intent entity and its category-derived priority.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{IntentId, MessageId};

/// Category of a recognized intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentCategory {
    ArchitectureRequest,
    Modification,
    PricingQuery,
    Clarification,
}

impl IntentCategory {
    /// Fixed processing priority for this category (lower = first).
    pub fn priority(&self) -> u8 {
        match self {
            IntentCategory::ArchitectureRequest | IntentCategory::Modification => 1,
            IntentCategory::PricingQuery => 2,
            IntentCategory::Clarification => 3,
        }
    }

    /// Parses the wire name used by the language model.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "architecture_request" => Some(IntentCategory::ArchitectureRequest),
            "modification" => Some(IntentCategory::Modification),
            "pricing_query" => Some(IntentCategory::PricingQuery),
            "clarification" => Some(IntentCategory::Clarification),
            _ => None,
        }
    }

    /// Wire name used in prompts and responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentCategory::ArchitectureRequest => "architecture_request",
            IntentCategory::Modification => "modification",
            IntentCategory::PricingQuery => "pricing_query",
            IntentCategory::Clarification => "clarification",
        }
    }
}

impl std::fmt::Display for IntentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Processing status of an intent.
///
/// Transitions are forward-only: pending → processing → completed | failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl IntentStatus {
    /// Returns true when moving to `next` is a legal forward transition.
    pub fn can_transition_to(&self, next: IntentStatus) -> bool {
        matches!(
            (self, next),
            (IntentStatus::Pending, IntentStatus::Processing)
                | (IntentStatus::Processing, IntentStatus::Completed)
                | (IntentStatus::Processing, IntentStatus::Failed)
        )
    }

    /// Returns true for completed or failed.
    pub fn is_terminal(&self) -> bool {
        matches!(self, IntentStatus::Completed | IntentStatus::Failed)
    }

    /// Wire name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentStatus::Pending => "pending",
            IntentStatus::Processing => "processing",
            IntentStatus::Completed => "completed",
            IntentStatus::Failed => "failed",
        }
    }
}

/// A recognized user intent attached to one message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    id: IntentId,
    message_id: MessageId,
    category: IntentCategory,
    /// Always equals `category.priority()`; external values are corrected.
    priority: u8,
    confidence: f64,
    entities: BTreeMap<String, serde_json::Value>,
    status: IntentStatus,
}

impl Intent {
    /// Creates a pending intent.
    ///
    /// Priority is derived from the category; confidence is clamped
    /// into [0, 1].
    pub fn new(
        message_id: MessageId,
        category: IntentCategory,
        confidence: f64,
        entities: BTreeMap<String, serde_json::Value>,
    ) -> Self {
        Self {
            id: IntentId::new(),
            message_id,
            category,
            priority: category.priority(),
            confidence: confidence.clamp(0.0, 1.0),
            entities,
            status: IntentStatus::Pending,
        }
    }

    /// Reconstitutes an intent from persistence, re-deriving the
    /// priority so a stored mismatch is corrected rather than accepted.
    pub fn reconstitute(
        id: IntentId,
        message_id: MessageId,
        category: IntentCategory,
        confidence: f64,
        entities: BTreeMap<String, serde_json::Value>,
        status: IntentStatus,
    ) -> Self {
        Self {
            id,
            message_id,
            category,
            priority: category.priority(),
            confidence: confidence.clamp(0.0, 1.0),
            entities,
            status,
        }
    }

    pub fn id(&self) -> &IntentId {
        &self.id
    }

    pub fn message_id(&self) -> &MessageId {
        &self.message_id
    }

    pub fn category(&self) -> IntentCategory {
        self.category
    }

    pub fn priority(&self) -> u8 {
        self.priority
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn entities(&self) -> &BTreeMap<String, serde_json::Value> {
        &self.entities
    }

    pub fn status(&self) -> IntentStatus {
        self.status
    }

    /// Advances the status, rejecting backward or skipping transitions.
    pub fn transition_to(&mut self, next: IntentStatus) -> Result<(), IntentTransitionError> {
        if !self.status.can_transition_to(next) {
            return Err(IntentTransitionError {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }
}

/// Rejected intent status transition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("illegal intent transition {from:?} -> {to:?}")]
pub struct IntentTransitionError {
    pub from: IntentStatus,
    pub to: IntentStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intent(category: IntentCategory) -> Intent {
        Intent::new(MessageId::new(), category, 0.9, BTreeMap::new())
    }

    #[test]
    fn priority_is_derived_from_category() {
        assert_eq!(intent(IntentCategory::ArchitectureRequest).priority(), 1);
        assert_eq!(intent(IntentCategory::Modification).priority(), 1);
        assert_eq!(intent(IntentCategory::PricingQuery).priority(), 2);
        assert_eq!(intent(IntentCategory::Clarification).priority(), 3);
    }

    #[test]
    fn reconstitute_corrects_priority_mismatch() {
        // Stored rows carry no trusted priority; reconstitution always
        // re-derives it from the category.
        let restored = Intent::reconstitute(
            IntentId::new(),
            MessageId::new(),
            IntentCategory::PricingQuery,
            0.5,
            BTreeMap::new(),
            IntentStatus::Completed,
        );
        assert_eq!(restored.priority(), 2);
    }

    #[test]
    fn confidence_is_clamped() {
        let high = Intent::new(
            MessageId::new(),
            IntentCategory::Clarification,
            1.7,
            BTreeMap::new(),
        );
        let low = Intent::new(
            MessageId::new(),
            IntentCategory::Clarification,
            -0.2,
            BTreeMap::new(),
        );
        assert_eq!(high.confidence(), 1.0);
        assert_eq!(low.confidence(), 0.0);
    }

    #[test]
    fn status_machine_is_forward_only() {
        let mut i = intent(IntentCategory::PricingQuery);
        assert_eq!(i.status(), IntentStatus::Pending);
        i.transition_to(IntentStatus::Processing).unwrap();
        i.transition_to(IntentStatus::Completed).unwrap();
        assert!(i.transition_to(IntentStatus::Processing).is_err());
        assert!(i.transition_to(IntentStatus::Failed).is_err());
    }

    #[test]
    fn pending_cannot_skip_to_terminal() {
        let mut i = intent(IntentCategory::Clarification);
        assert!(i.transition_to(IntentStatus::Completed).is_err());
        assert!(i.transition_to(IntentStatus::Failed).is_err());
    }

    #[test]
    fn category_wire_names_round_trip() {
        for cat in [
            IntentCategory::ArchitectureRequest,
            IntentCategory::Modification,
            IntentCategory::PricingQuery,
            IntentCategory::Clarification,
        ] {
            assert_eq!(IntentCategory::parse(cat.as_str()), Some(cat));
        }
        assert_eq!(IntentCategory::parse("greeting"), None);
    }
}
