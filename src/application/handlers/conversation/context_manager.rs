//! Context retrieval and incremental update.
//!
//! The context has no store of its own: retrieval assembles it from
//! the session record, the requirement store, and recent messages;
//! every update is serialized back into the session's opaque context
//! blob and the session persisted.

use std::sync::Arc;

use crate::domain::conversation::{summarize, Context, ContextUpdate, SummaryPolicy};
use crate::domain::foundation::{DomainError, ErrorCode, SessionId};
use crate::domain::requirement::RequirementSet;
use crate::ports::{MessageStore, RequirementStore, SessionStore};

/// Messages loaded when assembling a context.
const HISTORY_LIMIT: usize = 50;

/// Assembles and persists the session working context.
pub struct ContextManager {
    sessions: Arc<dyn SessionStore>,
    messages: Arc<dyn MessageStore>,
    requirements: Arc<dyn RequirementStore>,
    summary_policy: SummaryPolicy,
}

impl ContextManager {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        messages: Arc<dyn MessageStore>,
        requirements: Arc<dyn RequirementStore>,
    ) -> Self {
        Self {
            sessions,
            messages,
            requirements,
            summary_policy: SummaryPolicy::default(),
        }
    }

    /// Rebuilds the context for a session; `None` when the session
    /// does not exist.
    ///
    /// The requirement set and summary are always assembled fresh
    /// from the stores; the current recommendation reference and last
    /// intents come from the session's stored blob.
    pub async fn retrieve(&self, session_id: &SessionId) -> Result<Option<Context>, DomainError> {
        let Some(session) = self.sessions.get(session_id).await? else {
            return Ok(None);
        };

        let mut context = match session.context() {
            Some(blob) => serde_json::from_value::<Context>(blob.clone()).unwrap_or_else(|err| {
                tracing::warn!(
                    session_id = %session_id,
                    error = %err,
                    "stored context blob unreadable, rebuilding fresh"
                );
                Context::new(*session_id)
            }),
            None => Context::new(*session_id),
        };

        let stored = self.requirements.get_by_session(session_id).await?;
        context.set_requirements(RequirementSet::from_items(stored));

        let history = self
            .messages
            .get_by_session(session_id, HISTORY_LIMIT, false)
            .await?;
        context.set_summary(summarize(&history, &self.summary_policy));

        Ok(Some(context))
    }

    /// Applies one turn's delta and writes the merged context back
    /// into the session record.
    ///
    /// With no prior context a fresh one is constructed from the
    /// supplied fields. The session must exist.
    pub async fn update(
        &self,
        session_id: &SessionId,
        update: ContextUpdate,
    ) -> Result<Context, DomainError> {
        let Some(mut session) = self.sessions.get(session_id).await? else {
            return Err(DomainError::new(
                ErrorCode::SessionNotFound,
                format!("Session not found: {}", session_id),
            ));
        };

        let mut context = match self.retrieve(session_id).await? {
            Some(existing) => existing,
            None => Context::new(*session_id),
        };
        context.apply(update);

        let blob = serde_json::to_value(&context).map_err(|e| {
            DomainError::new(
                ErrorCode::InternalError,
                format!("Failed to serialize context: {}", e),
            )
        })?;
        session.set_context(blob);
        self.sessions.update(&session).await?;

        Ok(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{
        InMemoryMessageStore, InMemoryRequirementStore, InMemorySessionStore,
    };
    use crate::domain::conversation::Message;
    use crate::domain::foundation::RecommendationId;
    use crate::domain::requirement::{Requirement, RequirementCategory};
    use crate::domain::session::Session;

    struct Fixture {
        sessions: Arc<InMemorySessionStore>,
        messages: Arc<InMemoryMessageStore>,
        requirements: Arc<InMemoryRequirementStore>,
        manager: ContextManager,
    }

    fn fixture() -> Fixture {
        let sessions = Arc::new(InMemorySessionStore::new());
        let messages = Arc::new(InMemoryMessageStore::new());
        let requirements = Arc::new(InMemoryRequirementStore::new());
        let manager = ContextManager::new(
            sessions.clone(),
            messages.clone(),
            requirements.clone(),
        );
        Fixture {
            sessions,
            messages,
            requirements,
            manager,
        }
    }

    async fn seeded_session(fx: &Fixture) -> SessionId {
        let session = Session::new(SessionId::new());
        let id = *session.id();
        fx.sessions.create(&session).await.unwrap();
        id
    }

    #[tokio::test]
    async fn retrieve_absent_session_returns_none() {
        let fx = fixture();
        let result = fx.manager.retrieve(&SessionId::new()).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn retrieve_assembles_requirements_and_summary() {
        let fx = fixture();
        let session_id = seeded_session(&fx).await;

        fx.requirements
            .create(&Requirement::new(
                session_id,
                RequirementCategory::Scale,
                "1000 users",
                0.9,
                None,
            ))
            .await
            .unwrap();
        fx.messages
            .create(&Message::user(session_id, "I need a web shop"))
            .await
            .unwrap();

        let context = fx.manager.retrieve(&session_id).await.unwrap().unwrap();
        assert_eq!(context.requirements().len(), 1);
        assert_eq!(context.summary(), Some("I need a web shop"));
    }

    #[tokio::test]
    async fn update_writes_context_into_session_blob() {
        let fx = fixture();
        let session_id = seeded_session(&fx).await;
        let rec_id = RecommendationId::new();

        fx.manager
            .update(
                &session_id,
                ContextUpdate::new()
                    .with_recommendation(rec_id)
                    .with_summary("building a shop"),
            )
            .await
            .unwrap();

        let session = fx.sessions.get(&session_id).await.unwrap().unwrap();
        let stored: Context =
            serde_json::from_value(session.context().unwrap().clone()).unwrap();
        assert_eq!(stored.current_recommendation_id(), Some(&rec_id));
    }

    #[tokio::test]
    async fn update_merges_requirements_idempotently() {
        let fx = fixture();
        let session_id = seeded_session(&fx).await;

        let update = || {
            ContextUpdate::new().with_requirements(vec![Requirement::new(
                session_id,
                RequirementCategory::Scale,
                "1000 users",
                0.9,
                None,
            )])
        };

        let once = fx.manager.update(&session_id, update()).await.unwrap();
        let twice = fx.manager.update(&session_id, update()).await.unwrap();
        assert_eq!(once.requirements().len(), 1);
        assert_eq!(twice.requirements().len(), 1);
    }

    #[tokio::test]
    async fn update_on_absent_session_is_an_error() {
        let fx = fixture();
        let err = fx
            .manager
            .update(&SessionId::new(), ContextUpdate::new())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::SessionNotFound);
    }

    #[tokio::test]
    async fn recommendation_reference_survives_retrieval_round_trip() {
        let fx = fixture();
        let session_id = seeded_session(&fx).await;
        let rec_id = RecommendationId::new();

        fx.manager
            .update(&session_id, ContextUpdate::new().with_recommendation(rec_id))
            .await
            .unwrap();

        let restored = fx.manager.retrieve(&session_id).await.unwrap().unwrap();
        assert_eq!(restored.current_recommendation_id(), Some(&rec_id));
    }
}
