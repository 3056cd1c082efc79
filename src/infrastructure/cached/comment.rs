//! Cached comment repository

use async_trait::async_trait;

use super::coordinator::{entity_key, CacheCoordinator};
use crate::cache_key;
use crate::domain::comment::{Comment, CommentRepository};
use crate::domain::entity::{EntityId, EntityKind};
use crate::domain::invalidation::{EvictionArgs, Operation, ReadOp};
use crate::domain::DomainError;

const KIND: EntityKind = EntityKind::Comment;

/// Comment repository wrapper that caches reads and invalidates on writes
pub struct CachedCommentRepository<R: CommentRepository> {
    inner: R,
    coordinator: CacheCoordinator,
}

impl<R: CommentRepository> CachedCommentRepository<R> {
    pub fn new(inner: R, coordinator: CacheCoordinator) -> Self {
        Self { inner, coordinator }
    }
}

#[async_trait]
impl<R: CommentRepository> CommentRepository for CachedCommentRepository<R> {
    async fn create(&self, belongs_to: &EntityId, comment: Comment) -> Result<Comment, DomainError> {
        self.coordinator
            .mutate(
                KIND,
                Operation::Create,
                EvictionArgs::new().parent(belongs_to),
                self.inner.create(belongs_to, comment),
            )
            .await
    }

    async fn get(&self, id: &EntityId) -> Result<Comment, DomainError> {
        self.coordinator
            .read_through(entity_key(KIND, id)?, self.inner.get(id))
            .await
    }

    async fn get_all_belongs_to(
        &self,
        belongs_to: &EntityId,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Comment>, DomainError> {
        let key = cache_key!(KIND, ReadOp::GetAllBelongsTo, belongs_to, offset, limit);

        self.coordinator
            .read_through(key, self.inner.get_all_belongs_to(belongs_to, offset, limit))
            .await
    }

    async fn update(&self, id: &EntityId, content: &str) -> Result<Comment, DomainError> {
        self.coordinator
            .update(KIND, id, self.inner.update(id, content))
            .await
    }

    async fn delete(&self, id: &EntityId) -> Result<(), DomainError> {
        self.coordinator
            .mutate(
                KIND,
                Operation::Delete,
                EvictionArgs::new().subject(id),
                self.inner.delete(id),
            )
            .await
    }
}
