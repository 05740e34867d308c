//! Message store port.
//!
//! Append-only, time-ordered persistence of per-session messages.

use async_trait::async_trait;

use crate::domain::conversation::Message;
use crate::domain::foundation::{DomainError, MessageId, SessionId};

/// Persistence for the ordered message history of a session.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Appends one message. Messages are immutable once created.
    async fn create(&self, message: &Message) -> Result<(), DomainError>;

    /// Messages for a session, ordered by timestamp.
    ///
    /// `newest_first` reverses the order; `limit` bounds the result.
    async fn get_by_session(
        &self,
        session_id: &SessionId,
        limit: usize,
        newest_first: bool,
    ) -> Result<Vec<Message>, DomainError>;

    /// Fetches one message by ID; `None` when absent.
    async fn get_by_id(&self, id: &MessageId) -> Result<Option<Message>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn MessageStore) {}
    }
}
