//! Session working context.
//!
//! The context is the mutable state a turn reads and writes: the
//! active requirement set, the current recommendation reference, a
//! bounded conversation summary, and the last processed intents. It is
//! rebuilt from the session and stores on demand and serialized back
//! into the session's opaque context blob after every update; it has
//! no store of its own.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{RecommendationId, SessionId, Timestamp};
use crate::domain::intent::Intent;
use crate::domain::requirement::{Requirement, RequirementSet};

/// Working state for one session, 1:1 with the session record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Context {
    session_id: SessionId,
    current_recommendation_id: Option<RecommendationId>,
    requirements: RequirementSet,
    summary: Option<String>,
    last_intents: Option<Vec<Intent>>,
    updated_at: Timestamp,
}

impl Context {
    /// Creates a fresh context for a session.
    pub fn new(session_id: SessionId) -> Self {
        Self {
            session_id,
            current_recommendation_id: None,
            requirements: RequirementSet::new(),
            summary: None,
            last_intents: None,
            updated_at: Timestamp::now(),
        }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn current_recommendation_id(&self) -> Option<&RecommendationId> {
        self.current_recommendation_id.as_ref()
    }

    pub fn requirements(&self) -> &RequirementSet {
        &self.requirements
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn last_intents(&self) -> Option<&[Intent]> {
        self.last_intents.as_deref()
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    /// Replaces the requirement set wholesale (context assembly).
    pub fn set_requirements(&mut self, requirements: RequirementSet) {
        self.requirements = requirements;
        self.updated_at = Timestamp::now();
    }

    /// Replaces the summary (context assembly).
    pub fn set_summary(&mut self, summary: impl Into<String>) {
        self.summary = Some(summary.into());
        self.updated_at = Timestamp::now();
    }

    /// Pins the current recommendation reference.
    pub fn set_current_recommendation(&mut self, id: RecommendationId) {
        self.current_recommendation_id = Some(id);
        self.updated_at = Timestamp::now();
    }

    /// Applies one turn's delta.
    ///
    /// Requirements merge under the value-dedup rule; intents,
    /// recommendation, and summary overwrite only when provided. The
    /// update timestamp always refreshes.
    pub fn apply(&mut self, update: ContextUpdate) {
        if let Some(new_requirements) = update.new_requirements {
            self.requirements.merge(new_requirements);
        }
        if let Some(intents) = update.new_intents {
            self.last_intents = Some(intents);
        }
        if let Some(id) = update.current_recommendation_id {
            self.current_recommendation_id = Some(id);
        }
        if let Some(summary) = update.summary {
            self.summary = Some(summary);
        }
        self.updated_at = Timestamp::now();
    }
}

/// One turn's context delta; every field optional.
#[derive(Debug, Clone, Default)]
pub struct ContextUpdate {
    pub new_requirements: Option<Vec<Requirement>>,
    pub new_intents: Option<Vec<Intent>>,
    pub current_recommendation_id: Option<RecommendationId>,
    pub summary: Option<String>,
}

impl ContextUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_requirements(mut self, requirements: Vec<Requirement>) -> Self {
        self.new_requirements = Some(requirements);
        self
    }

    pub fn with_intents(mut self, intents: Vec<Intent>) -> Self {
        self.new_intents = Some(intents);
        self
    }

    pub fn with_recommendation(mut self, id: RecommendationId) -> Self {
        self.current_recommendation_id = Some(id);
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.new_requirements.is_none()
            && self.new_intents.is_none()
            && self.current_recommendation_id.is_none()
            && self.summary.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::MessageId;
    use crate::domain::intent::IntentCategory;
    use crate::domain::requirement::RequirementCategory;
    use std::collections::BTreeMap;

    fn req(session_id: SessionId, value: &str) -> Requirement {
        Requirement::new(session_id, RequirementCategory::Scale, value, 0.9, None)
    }

    #[test]
    fn apply_merges_requirements_with_dedup() {
        let session_id = SessionId::new();
        let mut ctx = Context::new(session_id);

        ctx.apply(ContextUpdate::new().with_requirements(vec![req(session_id, "1000 users")]));
        ctx.apply(ContextUpdate::new().with_requirements(vec![
            req(session_id, "1000 users"),
            req(session_id, "low budget"),
        ]));

        assert_eq!(ctx.requirements().len(), 2);
    }

    #[test]
    fn apply_twice_with_same_input_is_idempotent() {
        let session_id = SessionId::new();
        let update = || {
            ContextUpdate::new().with_requirements(vec![
                req(session_id, "1000 users"),
                req(session_id, "web application"),
            ])
        };

        let mut ctx = Context::new(session_id);
        ctx.apply(update());
        let after_once: Vec<String> = ctx
            .requirements()
            .items()
            .iter()
            .map(|r| r.value().to_string())
            .collect();

        ctx.apply(update());
        let after_twice: Vec<String> = ctx
            .requirements()
            .items()
            .iter()
            .map(|r| r.value().to_string())
            .collect();

        assert_eq!(after_once, after_twice);
    }

    #[test]
    fn apply_overwrites_only_provided_fields() {
        let session_id = SessionId::new();
        let mut ctx = Context::new(session_id);
        let rec_id = RecommendationId::new();

        ctx.apply(
            ContextUpdate::new()
                .with_recommendation(rec_id)
                .with_summary("first summary"),
        );
        assert_eq!(ctx.current_recommendation_id(), Some(&rec_id));
        assert_eq!(ctx.summary(), Some("first summary"));

        // An empty delta leaves prior fields in place.
        ctx.apply(ContextUpdate::new());
        assert_eq!(ctx.current_recommendation_id(), Some(&rec_id));
        assert_eq!(ctx.summary(), Some("first summary"));
    }

    #[test]
    fn apply_replaces_last_intents() {
        let session_id = SessionId::new();
        let mut ctx = Context::new(session_id);
        let intent = Intent::new(
            MessageId::new(),
            IntentCategory::PricingQuery,
            0.8,
            BTreeMap::new(),
        );

        ctx.apply(ContextUpdate::new().with_intents(vec![intent.clone()]));
        assert_eq!(ctx.last_intents().unwrap().len(), 1);
        assert_eq!(*ctx.last_intents().unwrap()[0].id(), *intent.id());
    }

    #[test]
    fn context_round_trips_through_json_blob() {
        let session_id = SessionId::new();
        let mut ctx = Context::new(session_id);
        ctx.apply(
            ContextUpdate::new()
                .with_requirements(vec![req(session_id, "1000 users")])
                .with_summary("shop for 1000 users"),
        );

        let blob = serde_json::to_value(&ctx).unwrap();
        let restored: Context = serde_json::from_value(blob).unwrap();
        assert_eq!(restored, ctx);
    }
}
