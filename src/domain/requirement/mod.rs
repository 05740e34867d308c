//! Requirement domain: extracted facts about what the user wants,
//! and the session-active set with its dedup merge policy.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{MessageId, RequirementId, SessionId, Timestamp};

/// Category of an extracted requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementCategory {
    ApplicationType,
    Scale,
    Constraint,
    Preference,
}

impl RequirementCategory {
    /// Parses the wire name used by the language model.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "application_type" => Some(RequirementCategory::ApplicationType),
            "scale" => Some(RequirementCategory::Scale),
            "constraint" => Some(RequirementCategory::Constraint),
            "preference" => Some(RequirementCategory::Preference),
            _ => None,
        }
    }

    /// Wire name used in prompts and responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            RequirementCategory::ApplicationType => "application_type",
            RequirementCategory::Scale => "scale",
            RequirementCategory::Constraint => "constraint",
            RequirementCategory::Preference => "preference",
        }
    }

    /// All categories, in prompt order.
    pub fn all() -> [RequirementCategory; 4] {
        [
            RequirementCategory::ApplicationType,
            RequirementCategory::Scale,
            RequirementCategory::Constraint,
            RequirementCategory::Preference,
        ]
    }
}

impl std::fmt::Display for RequirementCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One extracted fact about the desired architecture.
///
/// Requirements are immutable once created; the active set only ever
/// appends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Requirement {
    id: RequirementId,
    session_id: SessionId,
    category: RequirementCategory,
    value: String,
    confidence: f64,
    source_message_id: Option<MessageId>,
    extracted_at: Timestamp,
}

impl Requirement {
    /// Creates a requirement extracted now.
    pub fn new(
        session_id: SessionId,
        category: RequirementCategory,
        value: impl Into<String>,
        confidence: f64,
        source_message_id: Option<MessageId>,
    ) -> Self {
        Self {
            id: RequirementId::new(),
            session_id,
            category,
            value: value.into(),
            confidence: confidence.clamp(0.0, 1.0),
            source_message_id,
            extracted_at: Timestamp::now(),
        }
    }

    /// Reconstitutes a requirement from persistence.
    pub fn reconstitute(
        id: RequirementId,
        session_id: SessionId,
        category: RequirementCategory,
        value: String,
        confidence: f64,
        source_message_id: Option<MessageId>,
        extracted_at: Timestamp,
    ) -> Self {
        Self {
            id,
            session_id,
            category,
            value,
            confidence: confidence.clamp(0.0, 1.0),
            source_message_id,
            extracted_at,
        }
    }

    pub fn id(&self) -> &RequirementId {
        &self.id
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn category(&self) -> RequirementCategory {
        self.category
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn source_message_id(&self) -> Option<&MessageId> {
        self.source_message_id.as_ref()
    }

    pub fn extracted_at(&self) -> &Timestamp {
        &self.extracted_at
    }
}

/// The session-active requirement set with append-only, value-deduped
/// merge semantics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequirementSet {
    items: Vec<Requirement>,
}

impl RequirementSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from already-deduplicated records, dropping any
    /// duplicate values that slipped into storage.
    pub fn from_items(items: Vec<Requirement>) -> Self {
        let mut set = Self::new();
        for item in items {
            set.insert(item);
        }
        set
    }

    /// Inserts one requirement unless its value is already present.
    ///
    /// The duplicate check is by value only, case-sensitive exact match:
    /// a `scale` value and a `constraint` value with identical text
    /// collide. Returns true when the requirement was appended.
    pub fn insert(&mut self, requirement: Requirement) -> bool {
        if self.contains_value(requirement.value()) {
            return false;
        }
        self.items.push(requirement);
        true
    }

    /// Merges newly extracted requirements, returning those actually
    /// appended. Existing entries are never removed or rewritten:
    /// a changed value ("1000 users" → "10000 users") accumulates a
    /// second record rather than superseding the first.
    pub fn merge(&mut self, new_requirements: Vec<Requirement>) -> Vec<Requirement> {
        let mut appended = Vec::new();
        for requirement in new_requirements {
            if self.insert(requirement.clone()) {
                appended.push(requirement);
            }
        }
        appended
    }

    /// Returns true when a requirement with this exact value exists.
    pub fn contains_value(&self, value: &str) -> bool {
        self.items.iter().any(|req| req.value() == value)
    }

    /// Requirements in a given category.
    pub fn by_category(&self, category: RequirementCategory) -> Vec<&Requirement> {
        self.items
            .iter()
            .filter(|req| req.category() == category)
            .collect()
    }

    /// Categories with no requirement yet, in prompt order.
    pub fn missing_categories(&self) -> Vec<RequirementCategory> {
        RequirementCategory::all()
            .into_iter()
            .filter(|category| self.by_category(*category).is_empty())
            .collect()
    }

    pub fn items(&self) -> &[Requirement] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl IntoIterator for RequirementSet {
    type Item = Requirement;
    type IntoIter = std::vec::IntoIter<Requirement>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(category: RequirementCategory, value: &str) -> Requirement {
        Requirement::new(SessionId::new(), category, value, 0.9, None)
    }

    #[test]
    fn insert_rejects_duplicate_value() {
        let mut set = RequirementSet::new();
        assert!(set.insert(req(RequirementCategory::Scale, "1000 users")));
        assert!(!set.insert(req(RequirementCategory::Scale, "1000 users")));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn duplicate_check_is_value_only_across_categories() {
        // Deliberate compatibility behavior: the key is the value text
        // alone, so equal text in another category still collides.
        let mut set = RequirementSet::new();
        assert!(set.insert(req(RequirementCategory::Scale, "1000")));
        assert!(!set.insert(req(RequirementCategory::Constraint, "1000")));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn duplicate_check_is_case_sensitive() {
        let mut set = RequirementSet::new();
        assert!(set.insert(req(RequirementCategory::ApplicationType, "web app")));
        assert!(set.insert(req(RequirementCategory::ApplicationType, "Web App")));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn changed_values_accumulate_instead_of_superseding() {
        let mut set = RequirementSet::new();
        set.insert(req(RequirementCategory::Scale, "100 users"));
        set.insert(req(RequirementCategory::Scale, "10000 users"));
        assert_eq!(set.by_category(RequirementCategory::Scale).len(), 2);
    }

    #[test]
    fn merge_returns_only_appended() {
        let mut set = RequirementSet::new();
        set.insert(req(RequirementCategory::Scale, "1000 users"));

        let appended = set.merge(vec![
            req(RequirementCategory::Scale, "1000 users"),
            req(RequirementCategory::Constraint, "high availability"),
        ]);
        assert_eq!(appended.len(), 1);
        assert_eq!(appended[0].value(), "high availability");
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn merge_is_idempotent() {
        let batch = vec![
            req(RequirementCategory::ApplicationType, "web application"),
            req(RequirementCategory::Scale, "1000 users"),
        ];

        let mut once = RequirementSet::new();
        once.merge(batch.clone());
        let mut twice = RequirementSet::new();
        twice.merge(batch.clone());
        twice.merge(batch);

        let values = |set: &RequirementSet| -> Vec<String> {
            set.items().iter().map(|r| r.value().to_string()).collect()
        };
        assert_eq!(values(&once), values(&twice));
    }

    #[test]
    fn missing_categories_reports_unseen() {
        let mut set = RequirementSet::new();
        set.insert(req(RequirementCategory::ApplicationType, "web application"));
        let missing = set.missing_categories();
        assert!(!missing.contains(&RequirementCategory::ApplicationType));
        assert!(missing.contains(&RequirementCategory::Scale));
        assert!(missing.contains(&RequirementCategory::Constraint));
        assert!(missing.contains(&RequirementCategory::Preference));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn value_strategy() -> impl Strategy<Value = String> {
            "[a-z0-9 ]{1,12}"
        }

        proptest! {
            #[test]
            fn novel_value_grows_set_by_one(values in proptest::collection::vec(value_strategy(), 1..20)) {
                let mut set = RequirementSet::new();
                for value in values {
                    let before = set.len();
                    let was_novel = !set.contains_value(&value);
                    set.insert(req(RequirementCategory::Constraint, &value));
                    if was_novel {
                        prop_assert_eq!(set.len(), before + 1);
                    } else {
                        prop_assert_eq!(set.len(), before);
                    }
                }
            }

            #[test]
            fn remerging_same_batch_never_grows_set(values in proptest::collection::vec(value_strategy(), 0..12)) {
                let batch: Vec<Requirement> = values
                    .iter()
                    .map(|v| req(RequirementCategory::Preference, v))
                    .collect();

                let mut set = RequirementSet::new();
                set.merge(batch.clone());
                let after_first = set.len();
                set.merge(batch);
                prop_assert_eq!(set.len(), after_first);
            }
        }
    }
}
