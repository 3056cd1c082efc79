//! Namespace repository trait

use async_trait::async_trait;

use super::entity::Namespace;
use crate::domain::entity::{EntityId, Patch};
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Repository for namespace persistence
#[cfg_attr(test, automock)]
#[async_trait]
pub trait NamespaceRepository: Send + Sync {
    async fn create(
        &self,
        organization: &EntityId,
        namespace: Namespace,
    ) -> Result<Namespace, DomainError>;

    async fn get(&self, id: &EntityId) -> Result<Namespace, DomainError>;

    /// Namespaces of one organization
    async fn get_all(
        &self,
        organization: &EntityId,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Namespace>, DomainError>;

    async fn update(&self, id: &EntityId, patch: &Patch) -> Result<Namespace, DomainError>;

    async fn delete(&self, id: &EntityId) -> Result<(), DomainError>;
}
