//! Todo repository trait

use async_trait::async_trait;

use super::entity::Todo;
use crate::domain::entity::{EntityId, Patch};
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Repository for todo persistence
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TodoRepository: Send + Sync {
    async fn create(&self, todo: Todo) -> Result<Todo, DomainError>;

    async fn get(&self, id: &EntityId) -> Result<Todo, DomainError>;

    /// Todos of one owner; `completed` filters by state when set
    async fn get_by_owner(
        &self,
        owner: &EntityId,
        completed: Option<bool>,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Todo>, DomainError>;

    async fn update(&self, id: &EntityId, patch: &Patch) -> Result<Todo, DomainError>;

    async fn delete(&self, id: &EntityId) -> Result<(), DomainError>;
}
