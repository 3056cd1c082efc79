//! Cached document repository

use async_trait::async_trait;

use super::coordinator::{entity_key, CacheCoordinator};
use crate::cache_key;
use crate::domain::document::{Document, DocumentRepository};
use crate::domain::entity::{EntityId, EntityKind, Patch};
use crate::domain::invalidation::{EvictionArgs, Operation, ReadOp};
use crate::domain::DomainError;

const KIND: EntityKind = EntityKind::Document;

/// Document repository wrapper that caches reads and invalidates on writes
///
/// Documents embed their comments, attachments and labels, so writes to any
/// of those kinds also clear `Document:*`.
pub struct CachedDocumentRepository<R: DocumentRepository> {
    inner: R,
    coordinator: CacheCoordinator,
}

impl<R: DocumentRepository> CachedDocumentRepository<R> {
    pub fn new(inner: R, coordinator: CacheCoordinator) -> Self {
        Self { inner, coordinator }
    }
}

#[async_trait]
impl<R: DocumentRepository> DocumentRepository for CachedDocumentRepository<R> {
    async fn create(
        &self,
        belongs_to: &EntityId,
        document: Document,
    ) -> Result<Document, DomainError> {
        self.coordinator
            .mutate(
                KIND,
                Operation::Create,
                EvictionArgs::new().parent(belongs_to),
                self.inner.create(belongs_to, document),
            )
            .await
    }

    async fn get(&self, id: &EntityId) -> Result<Document, DomainError> {
        self.coordinator
            .read_through(entity_key(KIND, id)?, self.inner.get(id))
            .await
    }

    async fn get_by_creator(
        &self,
        created_by: &EntityId,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Document>, DomainError> {
        let key = cache_key!(KIND, ReadOp::GetByCreator, created_by, offset, limit);

        self.coordinator
            .read_through(key, self.inner.get_by_creator(created_by, offset, limit))
            .await
    }

    async fn get_all_belongs_to(
        &self,
        belongs_to: &EntityId,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Document>, DomainError> {
        let key = cache_key!(KIND, ReadOp::GetAllBelongsTo, belongs_to, offset, limit);

        self.coordinator
            .read_through(key, self.inner.get_all_belongs_to(belongs_to, offset, limit))
            .await
    }

    async fn update(&self, id: &EntityId, patch: &Patch) -> Result<Document, DomainError> {
        self.coordinator
            .update(KIND, id, self.inner.update(id, patch))
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
    use crate::domain::cache::{CacheOp, Journal, MockCache};
    use crate::domain::document::MockDocumentRepository;
    use std::sync::Arc;

    fn id(kind: EntityKind, value: &str) -> EntityId {
        EntityId::new(kind, value).unwrap()
    }

    fn wrap(
        repo: MockDocumentRepository,
        cache: MockCache,
    ) -> (CachedDocumentRepository<MockDocumentRepository>, Arc<MockCache>) {
        let cache = Arc::new(cache);
        let coordinator = CacheCoordinator::new(cache.clone());
        (CachedDocumentRepository::new(repo, coordinator), cache)
    }

    #[tokio::test]
    async fn test_create_in_namespace() {
        let namespace = id(EntityKind::Namespace, "n1");
        let author = id(EntityKind::User, "u1");

        let mut repo = MockDocumentRepository::new();
        repo.expect_create().times(1).returning(|_, d| Ok(d));

        let (cached, cache) = wrap(repo, MockCache::new());

        cached
            .create(&namespace, Document::new(namespace.clone(), author, "Runbook"))
            .await
            .unwrap();

        assert_eq!(
            cache.journal().entries(),
            vec![
                "cache.delete_pattern Document:GetAllBelongsTo:Namespace:n1:*",
                "cache.delete_pattern Document:GetByCreator:*",
                "cache.delete_pattern Namespace:*",
            ]
        );
    }

    #[tokio::test]
    async fn test_update_then_get_serves_fresh_value() {
        let namespace = id(EntityKind::Namespace, "n1");
        let author = id(EntityKind::User, "u1");
        let mut fresh = Document::new(namespace, author, "Runbook v2");
        fresh.content = "Restart the worker".to_string();
        let doc_id = fresh.id.clone();

        let journal = Journal::new();
        let mut repo = MockDocumentRepository::new();
        let updated = fresh.clone();
        let repo_journal = journal.clone();
        repo.expect_update().times(1).returning(move |_, _| {
            repo_journal.record("repo.update");
            Ok(updated.clone())
        });
        repo.expect_get().times(0);

        let (cached, _) = wrap(repo, MockCache::with_journal(journal.clone()));
        let patch = Patch::new().set("title", "Runbook v2");

        cached.update(&doc_id, &patch).await.unwrap();
        assert_eq!(cached.get(&doc_id).await.unwrap(), fresh);

        assert_eq!(
            journal.entries(),
            vec![
                "repo.update".to_string(),
                format!("cache.set Document:{}", doc_id.value()),
                "cache.delete_pattern Document:GetAllBelongsTo:*".to_string(),
                "cache.delete_pattern Document:GetByCreator:*".to_string(),
                format!("cache.get Document:{}", doc_id.value()),
            ]
        );
    }

    #[tokio::test]
    async fn test_update_eviction_failure_reports_delete_error() {
        let namespace = id(EntityKind::Namespace, "n1");
        let author = id(EntityKind::User, "u1");
        let fresh = Document::new(namespace, author, "Runbook");
        let doc_id = fresh.id.clone();

        let mut repo = MockDocumentRepository::new();
        repo.expect_update()
            .times(1)
            .returning(move |_, _| Ok(fresh.clone()));

        let (cached, cache) = wrap(repo, MockCache::new().fail_nth(CacheOp::DeletePattern, 2));

        let result = cached.update(&doc_id, &Patch::new()).await;

        assert!(matches!(result, Err(DomainError::CacheDelete { .. })));
        assert_eq!(cache.keys(), vec![format!("Document:{}", doc_id.value())]);
    }

    #[tokio::test]
    async fn test_delete_clears_children_and_holders() {
        let doc = id(EntityKind::Document, "d1");

        let mut repo = MockDocumentRepository::new();
        repo.expect_delete().times(1).returning(|_| Ok(()));

        let cache = MockCache::new()
            .with_entry("Document:d1", &"stale")
            .with_entry("Comment:GetAllBelongsTo:Document:d1:0:10", &"stale")
            .with_entry("Comment:GetAllBelongsTo:Document:d2:0:10", &"kept")
            .with_entry("Project:GetAll:Namespace:n1:0:10", &"stale");
        let (cached, cache) = wrap(repo, cache);

        cached.delete(&doc).await.unwrap();

        assert_eq!(
            cache.journal().entries(),
            vec![
                "cache.delete Document:d1",
                "cache.delete_pattern Document:GetAllBelongsTo:*",
                "cache.delete_pattern Document:GetByCreator:*",
                "cache.delete_pattern Comment:GetAllBelongsTo:Document:d1:*",
                "cache.delete_pattern Attachment:GetAllBelongsTo:Document:d1:*",
                "cache.delete_pattern Namespace:*",
                "cache.delete_pattern Project:*",
            ]
        );
        assert_eq!(cache.keys(), vec!["Comment:GetAllBelongsTo:Document:d2:0:10"]);
    }
}
