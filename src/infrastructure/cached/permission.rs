//! Cached permission repository

use async_trait::async_trait;

use super::coordinator::{entity_key, CacheCoordinator};
use crate::cache_key;
use crate::domain::entity::{EntityId, EntityKind};
use crate::domain::invalidation::{EvictionArgs, Operation, ReadOp};
use crate::domain::permission::{Permission, PermissionKind, PermissionRepository, SystemRole};
use crate::domain::DomainError;

const KIND: EntityKind = EntityKind::Permission;

/// Permission repository wrapper that caches reads and invalidates on writes
///
/// Boolean checks are cached like any other read. Every write clears all
/// permission listings and checks, since a grant can change answers for
/// subjects reached through roles.
pub struct CachedPermissionRepository<R: PermissionRepository> {
    inner: R,
    coordinator: CacheCoordinator,
}

impl<R: PermissionRepository> CachedPermissionRepository<R> {
    pub fn new(inner: R, coordinator: CacheCoordinator) -> Self {
        Self { inner, coordinator }
    }
}

fn kind_names(kinds: &[PermissionKind]) -> Vec<&'static str> {
    kinds.iter().map(PermissionKind::as_str).collect()
}

fn role_names(roles: &[SystemRole]) -> Vec<&'static str> {
    roles.iter().map(SystemRole::as_str).collect()
}

#[async_trait]
impl<R: PermissionRepository> PermissionRepository for CachedPermissionRepository<R> {
    async fn create(&self, permission: Permission) -> Result<Permission, DomainError> {
        let subject = permission.subject.clone();
        let target = permission.target.clone();

        self.coordinator
            .mutate(
                KIND,
                Operation::Create,
                EvictionArgs::new().parent(&target).related(&subject),
                self.inner.create(permission),
            )
            .await
    }

    async fn get(&self, id: &EntityId) -> Result<Permission, DomainError> {
        self.coordinator
            .read_through(entity_key(KIND, id)?, self.inner.get(id))
            .await
    }

    async fn get_by_subject(&self, subject: &EntityId) -> Result<Vec<Permission>, DomainError> {
        self.coordinator
            .read_through(
                cache_key!(KIND, ReadOp::GetBySubject, subject),
                self.inner.get_by_subject(subject),
            )
            .await
    }

    async fn get_by_target(&self, target: &EntityId) -> Result<Vec<Permission>, DomainError> {
        self.coordinator
            .read_through(
                cache_key!(KIND, ReadOp::GetByTarget, target),
                self.inner.get_by_target(target),
            )
            .await
    }

    async fn get_by_subject_and_target(
        &self,
        subject: &EntityId,
        target: &EntityId,
    ) -> Result<Vec<Permission>, DomainError> {
        self.coordinator
            .read_through(
                cache_key!(KIND, ReadOp::GetBySubjectAndTarget, subject, target),
                self.inner.get_by_subject_and_target(subject, target),
            )
            .await
    }

    async fn has_permission(
        &self,
        subject: &EntityId,
        target: &EntityId,
        kinds: &[PermissionKind],
    ) -> Result<bool, DomainError> {
        let key = cache_key!(
            KIND,
            ReadOp::HasPermission,
            subject,
            target,
            kind_names(kinds)
        );

        self.coordinator
            .read_through(key, self.inner.has_permission(subject, target, kinds))
            .await
    }

    async fn has_any_relation(
        &self,
        subject: &EntityId,
        target: &EntityId,
    ) -> Result<bool, DomainError> {
        self.coordinator
            .read_through(
                cache_key!(KIND, ReadOp::HasAnyRelation, subject, target),
                self.inner.has_any_relation(subject, target),
            )
            .await
    }

    async fn has_system_role(
        &self,
        subject: &EntityId,
        roles: &[SystemRole],
    ) -> Result<bool, DomainError> {
        let key = cache_key!(KIND, ReadOp::HasSystemRole, subject, role_names(roles));

        self.coordinator
            .read_through(key, self.inner.has_system_role(subject, roles))
            .await
    }

    async fn update(&self, id: &EntityId, kind: PermissionKind) -> Result<Permission, DomainError> {
        self.coordinator
            .update(KIND, id, self.inner.update(id, kind))
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
    use crate::domain::cache::MockCache;
    use crate::domain::permission::MockPermissionRepository;
    use std::sync::Arc;

    fn id(kind: EntityKind, value: &str) -> EntityId {
        EntityId::new(kind, value).unwrap()
    }

    fn wrap(
        repo: MockPermissionRepository,
        cache: MockCache,
    ) -> (CachedPermissionRepository<MockPermissionRepository>, Arc<MockCache>) {
        let cache = Arc::new(cache);
        let coordinator = CacheCoordinator::new(cache.clone());
        (CachedPermissionRepository::new(repo, coordinator), cache)
    }

    #[tokio::test]
    async fn test_has_permission_keyed_by_kinds() {
        let user = id(EntityKind::User, "u1");
        let doc = id(EntityKind::Document, "d1");

        let mut repo = MockPermissionRepository::new();
        repo.expect_has_permission()
            .times(2)
            .returning(|_, _, kinds| Ok(kinds.contains(&PermissionKind::Read)));

        let (cached, cache) = wrap(repo, MockCache::new());

        let read = [PermissionKind::Read];
        let admin = [PermissionKind::Admin, PermissionKind::Owner];

        assert!(cached.has_permission(&user, &doc, &read).await.unwrap());
        assert!(cached.has_permission(&user, &doc, &read).await.unwrap());
        assert!(!cached.has_permission(&user, &doc, &admin).await.unwrap());

        assert_eq!(
            cache.keys(),
            vec![
                "Permission:HasPermission:User:u1:Document:d1:admin:owner",
                "Permission:HasPermission:User:u1:Document:d1:read",
            ]
        );
    }

    #[tokio::test]
    async fn test_cached_false_is_a_hit() {
        let user = id(EntityKind::User, "u1");

        let mut repo = MockPermissionRepository::new();
        repo.expect_has_system_role().times(1).returning(|_, _| Ok(false));

        let (cached, _) = wrap(repo, MockCache::new());
        let roles = [SystemRole::Admin];

        assert!(!cached.has_system_role(&user, &roles).await.unwrap());
        assert!(!cached.has_system_role(&user, &roles).await.unwrap());
    }

    #[tokio::test]
    async fn test_create_clears_every_answer() {
        let mut repo = MockPermissionRepository::new();
        repo.expect_create().times(1).returning(Ok);

        let cache = MockCache::new()
            .with_entry("Permission:HasAnyRelation:User:u1:Document:d1", &false)
            .with_entry("Permission:GetBySubject:User:u2", &Vec::<Permission>::new());
        let (cached, cache) = wrap(repo, cache);

        cached
            .create(Permission::new(
                id(EntityKind::User, "u1"),
                id(EntityKind::Document, "d1"),
                PermissionKind::Write,
            ))
            .await
            .unwrap();

        assert_eq!(
            cache.journal().entries(),
            vec![
                "cache.delete_pattern Permission:GetBySubject:*",
                "cache.delete_pattern Permission:GetByTarget:*",
                "cache.delete_pattern Permission:GetBySubjectAndTarget:*",
                "cache.delete_pattern Permission:HasPermission:*",
                "cache.delete_pattern Permission:HasAnyRelation:*",
                "cache.delete_pattern Permission:HasSystemRole:*",
            ]
        );
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_delete_starts_with_own_key() {
        let mut repo = MockPermissionRepository::new();
        repo.expect_delete().times(1).returning(|_| Ok(()));

        let (cached, cache) = wrap(repo, MockCache::new());

        cached.delete(&id(EntityKind::Permission, "pm1")).await.unwrap();

        let entries = cache.journal().entries();
        assert_eq!(entries.len(), 7);
        assert_eq!(entries[0], "cache.delete Permission:pm1");
    }
}
