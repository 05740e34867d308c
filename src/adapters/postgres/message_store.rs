//! PostgreSQL implementation of the message store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};

use crate::domain::conversation::{Message, MessageRole};
use crate::domain::foundation::{DomainError, ErrorCode, MessageId, SessionId, Timestamp};
use crate::domain::intent::Intent;
use crate::ports::MessageStore;

/// PostgreSQL [`MessageStore`].
#[derive(Clone)]
pub struct PostgresMessageStore {
    pool: PgPool,
}

impl PostgresMessageStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageStore for PostgresMessageStore {
    async fn create(&self, message: &Message) -> Result<(), DomainError> {
        let intents = serde_json::to_value(message.intents()).map_err(|e| {
            DomainError::new(
                ErrorCode::InternalError,
                format!("Failed to serialize intents: {}", e),
            )
        })?;

        sqlx::query(
            r#"
            INSERT INTO messages (
                id, session_id, created_at, role, content, intents, metadata
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(message.id().as_uuid())
        .bind(message.session_id().as_uuid())
        .bind(message.timestamp().as_datetime())
        .bind(message.role().as_str())
        .bind(message.content())
        .bind(intents)
        .bind(message.metadata())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to insert message: {}", e),
            )
        })?;

        Ok(())
    }

    async fn get_by_session(
        &self,
        session_id: &SessionId,
        limit: usize,
        newest_first: bool,
    ) -> Result<Vec<Message>, DomainError> {
        let order = if newest_first { "DESC" } else { "ASC" };
        let query = format!(
            r#"
            SELECT id, session_id, created_at, role, content, intents, metadata
            FROM messages
            WHERE session_id = $1
            ORDER BY created_at {}
            LIMIT $2
            "#,
            order
        );

        let rows = sqlx::query(&query)
            .bind(session_id.as_uuid())
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to fetch messages: {}", e),
                )
            })?;

        rows.into_iter().map(row_to_message).collect()
    }

    async fn get_by_id(&self, id: &MessageId) -> Result<Option<Message>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, session_id, created_at, role, content, intents, metadata
            FROM messages
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch message: {}", e),
            )
        })?;

        row.map(row_to_message).transpose()
    }
}

fn row_to_message(row: sqlx::postgres::PgRow) -> Result<Message, DomainError> {
    let map_err = |e: sqlx::Error| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to read message row: {}", e),
        )
    };

    let id: uuid::Uuid = row.try_get("id").map_err(map_err)?;
    let session_id: uuid::Uuid = row.try_get("session_id").map_err(map_err)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(map_err)?;
    let role: String = row.try_get("role").map_err(map_err)?;
    let content: String = row.try_get("content").map_err(map_err)?;
    let intents: serde_json::Value = row.try_get("intents").map_err(map_err)?;
    let metadata: Option<serde_json::Value> = row.try_get("metadata").map_err(map_err)?;

    let role = MessageRole::parse(&role).ok_or_else(|| {
        DomainError::new(
            ErrorCode::InvalidFormat,
            format!("Unknown message role: {}", role),
        )
    })?;
    let intents: Vec<Intent> = serde_json::from_value(intents).map_err(|e| {
        DomainError::new(
            ErrorCode::InvalidFormat,
            format!("Failed to deserialize intents: {}", e),
        )
    })?;

    Ok(Message::reconstitute(
        MessageId::from_uuid(id),
        SessionId::from_uuid(session_id),
        Timestamp::from_datetime(created_at),
        role,
        content,
        intents,
        metadata,
    ))
}
