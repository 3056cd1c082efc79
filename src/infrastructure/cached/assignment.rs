//! Cached assignment repository

use async_trait::async_trait;

use super::coordinator::{entity_key, CacheCoordinator};
use crate::cache_key;
use crate::domain::assignment::{Assignment, AssignmentRepository};
use crate::domain::entity::{EntityId, EntityKind};
use crate::domain::invalidation::{EvictionArgs, Operation, ReadOp};
use crate::domain::DomainError;

const KIND: EntityKind = EntityKind::Assignment;

/// Assignment repository wrapper that caches reads and invalidates on writes
///
/// Assignments are immutable; a reassignment is a delete followed by a create.
pub struct CachedAssignmentRepository<R: AssignmentRepository> {
    inner: R,
    coordinator: CacheCoordinator,
}

impl<R: AssignmentRepository> CachedAssignmentRepository<R> {
    pub fn new(inner: R, coordinator: CacheCoordinator) -> Self {
        Self { inner, coordinator }
    }
}

#[async_trait]
impl<R: AssignmentRepository> AssignmentRepository for CachedAssignmentRepository<R> {
    async fn create(&self, assignment: Assignment) -> Result<Assignment, DomainError> {
        let user = assignment.user.clone();
        let resource = assignment.resource.clone();

        self.coordinator
            .mutate(
                KIND,
                Operation::Create,
                EvictionArgs::new().related(&user).parent(&resource),
                self.inner.create(assignment),
            )
            .await
    }

    async fn get(&self, id: &EntityId) -> Result<Assignment, DomainError> {
        self.coordinator
            .read_through(entity_key(KIND, id)?, self.inner.get(id))
            .await
    }

    async fn get_by_user(
        &self,
        user: &EntityId,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Assignment>, DomainError> {
        let key = cache_key!(KIND, ReadOp::GetByUser, user, offset, limit);

        self.coordinator
            .read_through(key, self.inner.get_by_user(user, offset, limit))
            .await
    }

    async fn get_by_resource(
        &self,
        resource: &EntityId,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Assignment>, DomainError> {
        let key = cache_key!(KIND, ReadOp::GetByResource, resource, offset, limit);

        self.coordinator
            .read_through(key, self.inner.get_by_resource(resource, offset, limit))
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
    use crate::domain::assignment::{AssignmentKind, MockAssignmentRepository};
    use crate::domain::cache::MockCache;
    use std::sync::Arc;

    fn id(kind: EntityKind, value: &str) -> EntityId {
        EntityId::new(kind, value).unwrap()
    }

    fn wrap(
        repo: MockAssignmentRepository,
        cache: MockCache,
    ) -> (CachedAssignmentRepository<MockAssignmentRepository>, Arc<MockCache>) {
        let cache = Arc::new(cache);
        let coordinator = CacheCoordinator::new(cache.clone());
        (CachedAssignmentRepository::new(repo, coordinator), cache)
    }

    #[tokio::test]
    async fn test_create_on_issue() {
        let mut repo = MockAssignmentRepository::new();
        repo.expect_create().times(1).returning(Ok);

        let cache = MockCache::new()
            .with_entry("Assignment:GetByUser:User:u1:0:10", &"stale")
            .with_entry("Assignment:GetByUser:User:u2:0:10", &"kept")
            .with_entry("Issue:i1", &"stale")
            .with_entry("Document:d1", &"kept");
        let (cached, cache) = wrap(repo, cache);

        cached
            .create(Assignment::new(
                id(EntityKind::User, "u1"),
                id(EntityKind::Issue, "i1"),
                AssignmentKind::Assignee,
            ))
            .await
            .unwrap();

        assert_eq!(
            cache.journal().entries(),
            vec![
                "cache.delete_pattern Assignment:GetByUser:User:u1:*",
                "cache.delete_pattern Assignment:GetByResource:Issue:i1:*",
                "cache.delete_pattern Issue:*",
            ]
        );
        assert_eq!(
            cache.keys(),
            vec!["Assignment:GetByUser:User:u2:0:10", "Document:d1"]
        );
    }

    #[tokio::test]
    async fn test_listing_by_resource_cached() {
        let resource = id(EntityKind::Document, "d1");

        let mut repo = MockAssignmentRepository::new();
        repo.expect_get_by_resource()
            .times(1)
            .returning(|resource, _, _| {
                Ok(vec![Assignment::new(
                    EntityId::new(EntityKind::User, "u1").unwrap(),
                    resource.clone(),
                    AssignmentKind::Reviewer,
                )])
            });

        let (cached, cache) = wrap(repo, MockCache::new());

        let first = cached.get_by_resource(&resource, 0, 10).await.unwrap();
        let second = cached.get_by_resource(&resource, 0, 10).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(cache.keys(), vec!["Assignment:GetByResource:Document:d1:0:10"]);
    }

    #[tokio::test]
    async fn test_delete() {
        let mut repo = MockAssignmentRepository::new();
        repo.expect_delete().times(1).returning(|_| Ok(()));

        let (cached, cache) = wrap(repo, MockCache::new());

        cached.delete(&id(EntityKind::Assignment, "a1")).await.unwrap();

        assert_eq!(
            cache.journal().entries(),
            vec![
                "cache.delete Assignment:a1",
                "cache.delete_pattern Assignment:GetByUser:*",
                "cache.delete_pattern Assignment:GetByResource:*",
                "cache.delete_pattern Document:*",
                "cache.delete_pattern Issue:*",
            ]
        );
    }
}
