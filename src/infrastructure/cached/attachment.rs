//! Cached attachment repository

use async_trait::async_trait;

use super::coordinator::{entity_key, CacheCoordinator};
use crate::cache_key;
use crate::domain::attachment::{Attachment, AttachmentRepository};
use crate::domain::entity::{EntityId, EntityKind};
use crate::domain::invalidation::{EvictionArgs, Operation, ReadOp};
use crate::domain::DomainError;

const KIND: EntityKind = EntityKind::Attachment;

pub struct CachedAttachmentRepository<R: AttachmentRepository> {
    inner: R,
    coordinator: CacheCoordinator,
}

impl<R: AttachmentRepository> CachedAttachmentRepository<R> {
    pub fn new(inner: R, coordinator: CacheCoordinator) -> Self {
        Self { inner, coordinator }
    }
}

#[async_trait]
impl<R: AttachmentRepository> AttachmentRepository for CachedAttachmentRepository<R> {
    async fn create(
        &self,
        belongs_to: &EntityId,
        attachment: Attachment,
    ) -> Result<Attachment, DomainError> {
        self.coordinator
            .mutate(
                KIND,
                Operation::Create,
                EvictionArgs::new().parent(belongs_to),
                self.inner.create(belongs_to, attachment),
            )
            .await
    }

    async fn get(&self, id: &EntityId) -> Result<Attachment, DomainError> {
        self.coordinator
            .read_through(entity_key(KIND, id)?, self.inner.get(id))
            .await
    }

    async fn get_all_belongs_to(
        &self,
        belongs_to: &EntityId,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Attachment>, DomainError> {
        let key = cache_key!(KIND, ReadOp::GetAllBelongsTo, belongs_to, offset, limit);

        self.coordinator
            .read_through(key, self.inner.get_all_belongs_to(belongs_to, offset, limit))
            .await
    }

    async fn update(&self, id: &EntityId, name: &str) -> Result<Attachment, DomainError> {
        self.coordinator
            .update(KIND, id, self.inner.update(id, name))
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::attachment::MockAttachmentRepository;
    use crate::domain::cache::MockCache;
    use std::sync::Arc;

    fn id(kind: EntityKind, value: &str) -> EntityId {
        EntityId::new(kind, value).unwrap()
    }

    fn wrap(
        repo: MockAttachmentRepository,
    ) -> (CachedAttachmentRepository<MockAttachmentRepository>, Arc<MockCache>) {
        let cache = Arc::new(MockCache::new());
        let coordinator = CacheCoordinator::new(cache.clone());
        (CachedAttachmentRepository::new(repo, coordinator), cache)
    }

    #[tokio::test]
    async fn test_get_reads_through_once() {
        let issue = id(EntityKind::Issue, "i1");
        let uploader = id(EntityKind::User, "u1");
        let stored = Attachment::new(issue, uploader, "trace.log").with_content("text/plain", 512);
        let attachment_id = stored.id.clone();

        let mut repo = MockAttachmentRepository::new();
        let loaded = stored.clone();
        repo.expect_get()
            .times(1)
            .returning(move |_| Ok(loaded.clone()));

        let (cached, cache) = wrap(repo);

        assert_eq!(cached.get(&attachment_id).await.unwrap(), stored);
        assert_eq!(cached.get(&attachment_id).await.unwrap(), stored);
        assert_eq!(cache.keys(), vec![format!("Attachment:{}", attachment_id.value())]);
    }

    #[tokio::test]
    async fn test_get_rejects_foreign_id() {
        let mut repo = MockAttachmentRepository::new();
        repo.expect_get().times(0);

        let (cached, _) = wrap(repo);

        let result = cached.get(&id(EntityKind::Comment, "c1")).await;
        assert!(matches!(result, Err(DomainError::InvalidId { .. })));
    }

    #[tokio::test]
    async fn test_not_found_passes_through_uncached() {
        let mut repo = MockAttachmentRepository::new();
        repo.expect_get()
            .times(2)
            .returning(|_| Err(DomainError::not_found("Attachment a1 not found")));

        let (cached, cache) = wrap(repo);
        let attachment = id(EntityKind::Attachment, "a1");

        assert!(cached.get(&attachment).await.unwrap_err().is_not_found());
        assert!(cached.get(&attachment).await.unwrap_err().is_not_found());
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_create_on_document() {
        let doc = id(EntityKind::Document, "d1");
        let uploader = id(EntityKind::User, "u1");

        let mut repo = MockAttachmentRepository::new();
        repo.expect_create().times(1).returning(|_, a| Ok(a));

        let (cached, cache) = wrap(repo);

        cached
            .create(&doc, Attachment::new(doc.clone(), uploader, "spec.pdf"))
            .await
            .unwrap();

        assert_eq!(
            cache.journal().entries(),
            vec![
                "cache.delete_pattern Attachment:GetAllBelongsTo:Document:d1:*",
                "cache.delete_pattern Document:*",
            ]
        );
    }

    #[tokio::test]
    async fn test_delete_twice_repeats_evictions() {
        let mut repo = MockAttachmentRepository::new();
        let mut calls = 0;
        repo.expect_delete().times(2).returning(move |_| {
            calls += 1;
            if calls == 1 {
                Ok(())
            } else {
                Err(DomainError::not_found("Attachment a1 not found"))
            }
        });

        let (cached, cache) = wrap(repo);
        let attachment = id(EntityKind::Attachment, "a1");

        assert!(cached.delete(&attachment).await.is_ok());
        let first = cache.journal().entries();
        cache.journal().clear();

        assert!(cached.delete(&attachment).await.unwrap_err().is_not_found());
        assert_eq!(cache.journal().entries(), first);
    }
}
