//! Session validation, resumption, and context restoration.
//!
//! Absence and expiry are deliberately indistinguishable to callers:
//! both surface as `None`, so a response never leaks whether a
//! session ever existed.

use std::sync::Arc;

use crate::application::handlers::conversation::ContextManager;
use crate::domain::conversation::Context;
use crate::domain::foundation::{DomainError, SessionId, Timestamp};
use crate::domain::session::Session;
use crate::ports::SessionStore;

/// Session lifecycle decisions.
pub struct SessionLifecycle {
    sessions: Arc<dyn SessionStore>,
    context: Arc<ContextManager>,
}

impl SessionLifecycle {
    pub fn new(sessions: Arc<dyn SessionStore>, context: Arc<ContextManager>) -> Self {
        Self { sessions, context }
    }

    /// True when the session exists and has not reached its expiry.
    pub async fn validate(&self, session_id: &SessionId) -> Result<bool, DomainError> {
        let Some(session) = self.sessions.get(session_id).await? else {
            return Ok(false);
        };
        Ok(!session.is_expired(&Timestamp::now()))
    }

    /// Resumes a session: validates, refreshes the last-access time,
    /// persists, and returns the refreshed record. Absent or expired
    /// sessions yield `None`, never an error.
    pub async fn resume(&self, session_id: &SessionId) -> Result<Option<Session>, DomainError> {
        let Some(mut session) = self.sessions.get(session_id).await? else {
            return Ok(None);
        };
        if session.is_expired(&Timestamp::now()) {
            return Ok(None);
        }

        session.touch();
        self.sessions.update(&session).await?;
        Ok(Some(session))
    }

    /// Restores the working context for a valid session.
    pub async fn restore_context(
        &self,
        session_id: &SessionId,
    ) -> Result<Option<Context>, DomainError> {
        if !self.validate(session_id).await? {
            return Ok(None);
        }
        self.context.retrieve(session_id).await
    }
}
