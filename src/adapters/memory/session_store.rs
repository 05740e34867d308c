//! In-memory session store for tests and development.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, SessionId};
use crate::domain::session::Session;
use crate::ports::SessionStore;

/// HashMap-backed [`SessionStore`]. Not suitable for production use.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, Session>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions (test helper).
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self, session: &Session) -> Result<(), DomainError> {
        self.sessions
            .write()
            .await
            .insert(*session.id(), session.clone());
        Ok(())
    }

    async fn get(&self, id: &SessionId) -> Result<Option<Session>, DomainError> {
        Ok(self.sessions.read().await.get(id).cloned())
    }

    async fn update(&self, session: &Session) -> Result<(), DomainError> {
        let mut sessions = self.sessions.write().await;
        if !sessions.contains_key(session.id()) {
            return Err(DomainError::new(
                ErrorCode::SessionNotFound,
                format!("Session not found: {}", session.id()),
            ));
        }
        sessions.insert(*session.id(), session.clone());
        Ok(())
    }

    async fn delete(&self, id: &SessionId) -> Result<bool, DomainError> {
        Ok(self.sessions.write().await.remove(id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_get_update_delete_round_trip() {
        let store = InMemorySessionStore::new();
        let mut session = Session::new(SessionId::new());

        store.create(&session).await.unwrap();
        assert!(store.get(session.id()).await.unwrap().is_some());

        session.touch();
        store.update(&session).await.unwrap();

        assert!(store.delete(session.id()).await.unwrap());
        assert!(!store.delete(session.id()).await.unwrap());
        assert!(store.get(session.id()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_of_absent_session_errors() {
        let store = InMemorySessionStore::new();
        let session = Session::new(SessionId::new());
        let err = store.update(&session).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::SessionNotFound);
    }
}
