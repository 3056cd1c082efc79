//! Attachment repository trait

use async_trait::async_trait;

use super::entity::Attachment;
use crate::domain::entity::EntityId;
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Repository for attachment persistence
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AttachmentRepository: Send + Sync {
    async fn create(
        &self,
        belongs_to: &EntityId,
        attachment: Attachment,
    ) -> Result<Attachment, DomainError>;

    async fn get(&self, id: &EntityId) -> Result<Attachment, DomainError>;

    /// Attachments of one document or issue, in creation order
    async fn get_all_belongs_to(
        &self,
        belongs_to: &EntityId,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Attachment>, DomainError>;

    /// Renames an attachment
    async fn update(&self, id: &EntityId, name: &str) -> Result<Attachment, DomainError>;

    async fn delete(&self, id: &EntityId) -> Result<(), DomainError>;
}
