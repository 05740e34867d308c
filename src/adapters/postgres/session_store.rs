//! PostgreSQL implementation of the session store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};

use crate::domain::foundation::{DomainError, ErrorCode, SessionId, Timestamp};
use crate::domain::session::Session;
use crate::ports::SessionStore;

/// PostgreSQL [`SessionStore`].
#[derive(Clone)]
pub struct PostgresSessionStore {
    pool: PgPool,
}

impl PostgresSessionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PostgresSessionStore {
    async fn create(&self, session: &Session) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO sessions (
                id, created_at, last_accessed_at, expires_at, context, preferences
            ) VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(session.id().as_uuid())
        .bind(session.created_at().as_datetime())
        .bind(session.last_accessed_at().as_datetime())
        .bind(session.expires_at().as_datetime())
        .bind(session.context())
        .bind(session.preferences())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to insert session: {}", e),
            )
        })?;

        Ok(())
    }

    async fn get(&self, id: &SessionId) -> Result<Option<Session>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, created_at, last_accessed_at, expires_at, context, preferences
            FROM sessions
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch session: {}", e),
            )
        })?;

        row.map(row_to_session).transpose()
    }

    async fn update(&self, session: &Session) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE sessions SET
                last_accessed_at = $2,
                context = $3,
                preferences = $4
            WHERE id = $1
            "#,
        )
        .bind(session.id().as_uuid())
        .bind(session.last_accessed_at().as_datetime())
        .bind(session.context())
        .bind(session.preferences())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to update session: {}", e),
            )
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::SessionNotFound,
                format!("Session not found: {}", session.id()),
            ));
        }

        Ok(())
    }

    async fn delete(&self, id: &SessionId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to delete session: {}", e),
                )
            })?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_session(row: sqlx::postgres::PgRow) -> Result<Session, DomainError> {
    let map_err = |e: sqlx::Error| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to read session row: {}", e),
        )
    };

    let id: uuid::Uuid = row.try_get("id").map_err(map_err)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(map_err)?;
    let last_accessed_at: DateTime<Utc> = row.try_get("last_accessed_at").map_err(map_err)?;
    let expires_at: DateTime<Utc> = row.try_get("expires_at").map_err(map_err)?;
    let context: Option<serde_json::Value> = row.try_get("context").map_err(map_err)?;
    let preferences: Option<serde_json::Value> = row.try_get("preferences").map_err(map_err)?;

    Ok(Session::reconstitute(
        SessionId::from_uuid(id),
        Timestamp::from_datetime(created_at),
        Timestamp::from_datetime(last_accessed_at),
        Timestamp::from_datetime(expires_at),
        context,
        preferences,
    ))
}
