//! Session aggregate entity.
//!
//! A session is the durable container for one conversation with the
//! advisor. It owns the lifecycle timestamps and carries the opaque
//! context blob the context manager writes back after every turn.
//!
//! # Invariants
//!
//! - `expires_at` is always exactly [`SESSION_TTL_DAYS`] days past
//!   `created_at`, computed once at construction; no mutator exists.
//! - A session whose expiry has been reached is unusable for resumption;
//!   purging the record is the store's concern, not the aggregate's.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{SessionId, Timestamp};

/// Fixed session lifetime.
pub const SESSION_TTL_DAYS: i64 = 30;

/// Durable conversation session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    id: SessionId,
    created_at: Timestamp,
    last_accessed_at: Timestamp,
    expires_at: Timestamp,
    /// Serialized working context, owned by the context manager.
    context: Option<serde_json::Value>,
    /// User preferences (region, language, currency).
    preferences: Option<serde_json::Value>,
}

impl Session {
    /// Creates a new session expiring [`SESSION_TTL_DAYS`] days from now.
    pub fn new(id: SessionId) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            created_at: now,
            last_accessed_at: now,
            expires_at: now.add_days(SESSION_TTL_DAYS),
            context: None,
            preferences: None,
        }
    }

    /// Reconstitutes a session from persistence (no validation).
    pub fn reconstitute(
        id: SessionId,
        created_at: Timestamp,
        last_accessed_at: Timestamp,
        expires_at: Timestamp,
        context: Option<serde_json::Value>,
        preferences: Option<serde_json::Value>,
    ) -> Self {
        Self {
            id,
            created_at,
            last_accessed_at,
            expires_at,
            context,
            preferences,
        }
    }

    /// Returns the session ID.
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Returns the creation timestamp.
    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// Returns the last-access timestamp.
    pub fn last_accessed_at(&self) -> &Timestamp {
        &self.last_accessed_at
    }

    /// Returns the expiry timestamp.
    pub fn expires_at(&self) -> &Timestamp {
        &self.expires_at
    }

    /// Returns the stored context blob, if any.
    pub fn context(&self) -> Option<&serde_json::Value> {
        self.context.as_ref()
    }

    /// Returns the stored preferences, if any.
    pub fn preferences(&self) -> Option<&serde_json::Value> {
        self.preferences.as_ref()
    }

    /// Refreshes the last-access timestamp.
    pub fn touch(&mut self) {
        self.last_accessed_at = Timestamp::now();
    }

    /// Replaces the stored context blob.
    pub fn set_context(&mut self, context: serde_json::Value) {
        self.context = Some(context);
    }

    /// Replaces the stored preferences.
    pub fn set_preferences(&mut self, preferences: serde_json::Value) {
        self.preferences = Some(preferences);
    }

    /// Returns true once the expiry instant has been reached.
    ///
    /// The boundary itself counts as expired: resumption requires
    /// strictly `now < expires_at`.
    pub fn is_expired(&self, now: &Timestamp) -> bool {
        !now.is_before(&self.expires_at)
    }

    /// Whole days until expiry, clamped to zero once expired.
    pub fn remaining_days(&self, now: &Timestamp) -> i64 {
        if self.is_expired(now) {
            return 0;
        }
        self.expires_at.duration_since(now).num_days()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn new_session_expires_thirty_days_after_creation() {
        let session = Session::new(SessionId::new());
        let window = session
            .expires_at()
            .duration_since(session.created_at());
        assert_eq!(window, Duration::days(SESSION_TTL_DAYS));
    }

    #[test]
    fn touch_updates_only_last_access() {
        let mut session = Session::new(SessionId::new());
        let created = *session.created_at();
        let expires = *session.expires_at();
        session.touch();
        assert_eq!(*session.created_at(), created);
        assert_eq!(*session.expires_at(), expires);
        assert!(session.last_accessed_at() >= &created);
    }

    #[test]
    fn expiry_boundary_counts_as_expired() {
        let session = Session::new(SessionId::new());
        let at_expiry = *session.expires_at();
        assert!(session.is_expired(&at_expiry));
        assert!(session.is_expired(&at_expiry.plus_secs(1)));
        assert!(!session.is_expired(&at_expiry.minus_secs(1)));
    }

    #[test]
    fn remaining_days_clamps_to_zero() {
        let session = Session::new(SessionId::new());
        let past_expiry = session.expires_at().add_days(5);
        assert_eq!(session.remaining_days(&past_expiry), 0);
        let now = Timestamp::now();
        assert_eq!(session.remaining_days(&now), SESSION_TTL_DAYS - 1);
    }

    #[test]
    fn context_blob_round_trips() {
        let mut session = Session::new(SessionId::new());
        assert!(session.context().is_none());
        session.set_context(serde_json::json!({"summary": "hello"}));
        assert_eq!(
            session.context().unwrap()["summary"],
            serde_json::json!("hello")
        );
    }
}
