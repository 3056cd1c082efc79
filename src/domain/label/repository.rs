//! Label repository trait

use async_trait::async_trait;

use super::entity::Label;
use crate::domain::entity::{EntityId, Patch};
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Repository for labels and their attachment to documents and issues
#[cfg_attr(test, automock)]
#[async_trait]
pub trait LabelRepository: Send + Sync {
    async fn create(&self, label: Label) -> Result<Label, DomainError>;

    async fn get(&self, id: &EntityId) -> Result<Label, DomainError>;

    async fn get_all(&self, offset: usize, limit: usize) -> Result<Vec<Label>, DomainError>;

    async fn update(&self, id: &EntityId, patch: &Patch) -> Result<Label, DomainError>;

    /// Attaches the label to a document or an issue
    async fn attach_to(&self, label: &EntityId, target: &EntityId) -> Result<(), DomainError>;

    async fn detach_from(&self, label: &EntityId, target: &EntityId) -> Result<(), DomainError>;

    async fn delete(&self, id: &EntityId) -> Result<(), DomainError>;
}
