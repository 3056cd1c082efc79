//! Assignment repository trait

use async_trait::async_trait;

use super::entity::Assignment;
use crate::domain::entity::EntityId;
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Repository for assignments; assignments are immutable once created
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    async fn create(&self, assignment: Assignment) -> Result<Assignment, DomainError>;

    async fn get(&self, id: &EntityId) -> Result<Assignment, DomainError>;

    async fn get_by_user(
        &self,
        user: &EntityId,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Assignment>, DomainError>;

    async fn get_by_resource(
        &self,
        resource: &EntityId,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Assignment>, DomainError>;

    async fn delete(&self, id: &EntityId) -> Result<(), DomainError>;
}
