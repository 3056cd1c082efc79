//! Document repository trait

use async_trait::async_trait;

use super::entity::Document;
use crate::domain::entity::{EntityId, Patch};
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Repository for document persistence
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    async fn create(
        &self,
        belongs_to: &EntityId,
        document: Document,
    ) -> Result<Document, DomainError>;

    async fn get(&self, id: &EntityId) -> Result<Document, DomainError>;

    /// Documents authored by one user
    async fn get_by_creator(
        &self,
        created_by: &EntityId,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Document>, DomainError>;

    /// Documents of one namespace or project
    async fn get_all_belongs_to(
        &self,
        belongs_to: &EntityId,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Document>, DomainError>;

    async fn update(&self, id: &EntityId, patch: &Patch) -> Result<Document, DomainError>;

    async fn delete(&self, id: &EntityId) -> Result<(), DomainError>;
}
