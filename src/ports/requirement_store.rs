//! Requirement store port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, SessionId};
use crate::domain::requirement::{Requirement, RequirementCategory};

/// Persistence for extracted requirement records.
#[async_trait]
pub trait RequirementStore: Send + Sync {
    /// Persists one requirement record.
    async fn create(&self, requirement: &Requirement) -> Result<(), DomainError>;

    /// All requirements for a session, in extraction order.
    async fn get_by_session(&self, session_id: &SessionId)
        -> Result<Vec<Requirement>, DomainError>;

    /// Requirements for a session in one category, in extraction order.
    async fn get_by_session_and_category(
        &self,
        session_id: &SessionId,
        category: RequirementCategory,
    ) -> Result<Vec<Requirement>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requirement_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn RequirementStore) {}
    }
}
