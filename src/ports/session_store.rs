//! Session store port.
//!
//! Key-value persistence of session records, keyed by session ID.
//! The store owns purging of expired rows; callers only ever see the
//! validity decision made by the session lifecycle manager.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, SessionId};
use crate::domain::session::Session;

/// Durable persistence for [`Session`] records.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persists a new session.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn create(&self, session: &Session) -> Result<(), DomainError>;

    /// Fetches a session by ID; `None` when absent.
    async fn get(&self, id: &SessionId) -> Result<Option<Session>, DomainError>;

    /// Updates an existing session (read-modify-write discipline is
    /// the caller's responsibility).
    ///
    /// # Errors
    ///
    /// - `SessionNotFound` if the session does not exist
    /// - `DatabaseError` on persistence failure
    async fn update(&self, session: &Session) -> Result<(), DomainError>;

    /// Deletes a session, returning whether a record was removed.
    async fn delete(&self, id: &SessionId) -> Result<bool, DomainError>;
}
