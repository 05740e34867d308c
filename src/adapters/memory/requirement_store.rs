//! In-memory requirement store for tests and development.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, SessionId};
use crate::domain::requirement::{Requirement, RequirementCategory};
use crate::ports::RequirementStore;

/// Vec-backed [`RequirementStore`].
#[derive(Default)]
pub struct InMemoryRequirementStore {
    requirements: Arc<RwLock<Vec<Requirement>>>,
}

impl InMemoryRequirementStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RequirementStore for InMemoryRequirementStore {
    async fn create(&self, requirement: &Requirement) -> Result<(), DomainError> {
        self.requirements.write().await.push(requirement.clone());
        Ok(())
    }

    async fn get_by_session(
        &self,
        session_id: &SessionId,
    ) -> Result<Vec<Requirement>, DomainError> {
        Ok(self
            .requirements
            .read()
            .await
            .iter()
            .filter(|req| req.session_id() == session_id)
            .cloned()
            .collect())
    }

    async fn get_by_session_and_category(
        &self,
        session_id: &SessionId,
        category: RequirementCategory,
    ) -> Result<Vec<Requirement>, DomainError> {
        Ok(self
            .requirements
            .read()
            .await
            .iter()
            .filter(|req| req.session_id() == session_id && req.category() == category)
            .cloned()
            .collect())
    }
}
