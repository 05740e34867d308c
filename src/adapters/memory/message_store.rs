//! In-memory message store for tests and development.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::conversation::Message;
use crate::domain::foundation::{DomainError, MessageId, SessionId};
use crate::ports::MessageStore;

/// Vec-backed append-only [`MessageStore`].
#[derive(Default)]
pub struct InMemoryMessageStore {
    messages: Arc<RwLock<Vec<Message>>>,
}

impl InMemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn create(&self, message: &Message) -> Result<(), DomainError> {
        self.messages.write().await.push(message.clone());
        Ok(())
    }

    async fn get_by_session(
        &self,
        session_id: &SessionId,
        limit: usize,
        newest_first: bool,
    ) -> Result<Vec<Message>, DomainError> {
        let messages = self.messages.read().await;
        let mut selected: Vec<Message> = messages
            .iter()
            .filter(|msg| msg.session_id() == session_id)
            .cloned()
            .collect();
        selected.sort_by_key(|msg| *msg.timestamp());
        if newest_first {
            selected.reverse();
        }
        selected.truncate(limit);
        Ok(selected)
    }

    async fn get_by_id(&self, id: &MessageId) -> Result<Option<Message>, DomainError> {
        Ok(self
            .messages
            .read()
            .await
            .iter()
            .find(|msg| msg.id() == id)
            .cloned())
    }
}
