//! Pure ordering helpers over intent lists.

use super::{Intent, IntentCategory};

/// Stable sort ascending by priority.
///
/// Ties keep the original classification order, so the processing
/// sequence is deterministic for equal-priority intents.
pub fn sort_by_priority(intents: &mut [Intent]) {
    intents.sort_by_key(|intent| intent.priority());
}

/// Filters intents by category.
pub fn filter_by_category(intents: &[Intent], category: IntentCategory) -> Vec<&Intent> {
    intents
        .iter()
        .filter(|intent| intent.category() == category)
        .collect()
}

/// Returns true when an architecture request or modification is present.
pub fn has_architecture_request(intents: &[Intent]) -> bool {
    intents.iter().any(|intent| {
        matches!(
            intent.category(),
            IntentCategory::ArchitectureRequest | IntentCategory::Modification
        )
    })
}

/// Returns true when a pricing query is present.
pub fn has_pricing_query(intents: &[Intent]) -> bool {
    intents
        .iter()
        .any(|intent| intent.category() == IntentCategory::PricingQuery)
}
