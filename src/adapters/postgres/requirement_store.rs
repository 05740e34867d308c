//! PostgreSQL implementation of the requirement store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};

use crate::domain::foundation::{DomainError, ErrorCode, MessageId, RequirementId, SessionId, Timestamp};
use crate::domain::requirement::{Requirement, RequirementCategory};
use crate::ports::RequirementStore;

/// PostgreSQL [`RequirementStore`].
#[derive(Clone)]
pub struct PostgresRequirementStore {
    pool: PgPool,
}

impl PostgresRequirementStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RequirementStore for PostgresRequirementStore {
    async fn create(&self, requirement: &Requirement) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO requirements (
                id, session_id, category, value, confidence, source_message_id, extracted_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(requirement.id().as_uuid())
        .bind(requirement.session_id().as_uuid())
        .bind(requirement.category().as_str())
        .bind(requirement.value())
        .bind(requirement.confidence())
        .bind(requirement.source_message_id().map(|id| *id.as_uuid()))
        .bind(requirement.extracted_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to insert requirement: {}", e),
            )
        })?;

        Ok(())
    }

    async fn get_by_session(
        &self,
        session_id: &SessionId,
    ) -> Result<Vec<Requirement>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, session_id, category, value, confidence, source_message_id, extracted_at
            FROM requirements
            WHERE session_id = $1
            ORDER BY extracted_at ASC
            "#,
        )
        .bind(session_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch requirements: {}", e),
            )
        })?;

        rows.into_iter().map(row_to_requirement).collect()
    }

    async fn get_by_session_and_category(
        &self,
        session_id: &SessionId,
        category: RequirementCategory,
    ) -> Result<Vec<Requirement>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, session_id, category, value, confidence, source_message_id, extracted_at
            FROM requirements
            WHERE session_id = $1 AND category = $2
            ORDER BY extracted_at ASC
            "#,
        )
        .bind(session_id.as_uuid())
        .bind(category.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch requirements by category: {}", e),
            )
        })?;

        rows.into_iter().map(row_to_requirement).collect()
    }
}

fn row_to_requirement(row: sqlx::postgres::PgRow) -> Result<Requirement, DomainError> {
    let map_err = |e: sqlx::Error| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to read requirement row: {}", e),
        )
    };

    let id: uuid::Uuid = row.try_get("id").map_err(map_err)?;
    let session_id: uuid::Uuid = row.try_get("session_id").map_err(map_err)?;
    let category: String = row.try_get("category").map_err(map_err)?;
    let value: String = row.try_get("value").map_err(map_err)?;
    let confidence: f64 = row.try_get("confidence").map_err(map_err)?;
    let source_message_id: Option<uuid::Uuid> =
        row.try_get("source_message_id").map_err(map_err)?;
    let extracted_at: DateTime<Utc> = row.try_get("extracted_at").map_err(map_err)?;

    let category = RequirementCategory::parse(&category).ok_or_else(|| {
        DomainError::new(
            ErrorCode::InvalidFormat,
            format!("Unknown requirement category: {}", category),
        )
    })?;

    Ok(Requirement::reconstitute(
        RequirementId::from_uuid(id),
        SessionId::from_uuid(session_id),
        category,
        value,
        confidence,
        source_message_id.map(MessageId::from_uuid),
        Timestamp::from_datetime(extracted_at),
    ))
}
