//! Message entity: one immutable entry in a session's ordered history.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{MessageId, SessionId, Timestamp};
use crate::domain::intent::Intent;

/// Role of the message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "user" => Some(MessageRole::User),
            "assistant" => Some(MessageRole::Assistant),
            _ => None,
        }
    }
}

/// A single message in a conversation. Immutable once created;
/// the session history is append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    id: MessageId,
    session_id: SessionId,
    timestamp: Timestamp,
    role: MessageRole,
    content: String,
    /// Intents recognized from this message (user messages only).
    intents: Vec<Intent>,
    /// Reply artifacts: diagram URLs, pricing references.
    metadata: Option<serde_json::Value>,
}

impl Message {
    /// Creates a user message.
    pub fn user(session_id: SessionId, content: impl Into<String>) -> Self {
        Self::build(session_id, MessageRole::User, content.into())
    }

    /// Creates an assistant message.
    pub fn assistant(session_id: SessionId, content: impl Into<String>) -> Self {
        Self::build(session_id, MessageRole::Assistant, content.into())
    }

    fn build(session_id: SessionId, role: MessageRole, content: String) -> Self {
        Self {
            id: MessageId::new(),
            session_id,
            timestamp: Timestamp::now(),
            role,
            content,
            intents: Vec::new(),
            metadata: None,
        }
    }

    /// Attaches recognized intents (builder-style, pre-persistence).
    pub fn with_intents(mut self, intents: Vec<Intent>) -> Self {
        self.intents = intents;
        self
    }

    /// Attaches reply metadata (builder-style, pre-persistence).
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Reconstitutes a message from persistence.
    pub fn reconstitute(
        id: MessageId,
        session_id: SessionId,
        timestamp: Timestamp,
        role: MessageRole,
        content: String,
        intents: Vec<Intent>,
        metadata: Option<serde_json::Value>,
    ) -> Self {
        Self {
            id,
            session_id,
            timestamp,
            role,
            content,
            intents,
            metadata,
        }
    }

    pub fn id(&self) -> &MessageId {
        &self.id
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn timestamp(&self) -> &Timestamp {
        &self.timestamp
    }

    pub fn role(&self) -> MessageRole {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn intents(&self) -> &[Intent] {
        &self.intents
    }

    pub fn metadata(&self) -> Option<&serde_json::Value> {
        self.metadata.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_and_assistant_constructors_set_role() {
        let session_id = SessionId::new();
        assert_eq!(Message::user(session_id, "hi").role(), MessageRole::User);
        assert_eq!(
            Message::assistant(session_id, "hello").role(),
            MessageRole::Assistant
        );
    }

    #[test]
    fn builder_attaches_metadata() {
        let msg = Message::assistant(SessionId::new(), "done")
            .with_metadata(serde_json::json!({"diagram_url": "/d/1.svg"}));
        assert_eq!(
            msg.metadata().unwrap()["diagram_url"],
            serde_json::json!("/d/1.svg")
        );
    }

    #[test]
    fn role_wire_names_round_trip() {
        assert_eq!(MessageRole::parse("user"), Some(MessageRole::User));
        assert_eq!(MessageRole::parse("assistant"), Some(MessageRole::Assistant));
        assert_eq!(MessageRole::parse("system"), None);
    }
}
