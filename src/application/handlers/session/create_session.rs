//! Session creation.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, SessionId};
use crate::domain::session::Session;
use crate::ports::SessionStore;

/// Creates new sessions with the fixed 30-day expiry.
pub struct CreateSessionHandler {
    sessions: Arc<dyn SessionStore>,
}

impl CreateSessionHandler {
    pub fn new(sessions: Arc<dyn SessionStore>) -> Self {
        Self { sessions }
    }

    pub async fn handle(&self) -> Result<Session, DomainError> {
        let session = Session::new(SessionId::new());
        self.sessions.create(&session).await?;
        tracing::info!(session_id = %session.id(), "session created");
        Ok(session)
    }
}
