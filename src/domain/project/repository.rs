//! Project repository trait

use async_trait::async_trait;

use super::entity::Project;
use crate::domain::entity::{EntityId, Patch};
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Repository for project persistence
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn create(&self, namespace: &EntityId, project: Project)
        -> Result<Project, DomainError>;

    async fn get(&self, id: &EntityId) -> Result<Project, DomainError>;

    /// Looks a project up by its unique key
    async fn get_by_key(&self, key: &str) -> Result<Project, DomainError>;

    /// Projects of one namespace
    async fn get_all(
        &self,
        namespace: &EntityId,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Project>, DomainError>;

    async fn update(&self, id: &EntityId, patch: &Patch) -> Result<Project, DomainError>;

    async fn delete(&self, id: &EntityId) -> Result<(), DomainError>;
}
