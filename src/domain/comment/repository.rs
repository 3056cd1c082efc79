//! Comment repository trait

use async_trait::async_trait;

use super::entity::Comment;
use crate::domain::entity::EntityId;
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Repository for comment persistence
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn create(&self, belongs_to: &EntityId, comment: Comment)
        -> Result<Comment, DomainError>;

    async fn get(&self, id: &EntityId) -> Result<Comment, DomainError>;

    async fn get_all_belongs_to(
        &self,
        belongs_to: &EntityId,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Comment>, DomainError>;

    /// Replaces the comment body
    async fn update(&self, id: &EntityId, content: &str) -> Result<Comment, DomainError>;

    async fn delete(&self, id: &EntityId) -> Result<(), DomainError>;
}
