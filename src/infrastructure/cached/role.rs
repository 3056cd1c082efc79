//! Cached role repository

use async_trait::async_trait;

use super::coordinator::{entity_key, CacheCoordinator};
use crate::cache_key;
use crate::domain::entity::{EntityId, EntityKind, Patch};
use crate::domain::invalidation::{EvictionArgs, Operation, ReadOp};
use crate::domain::role::{Role, RoleRepository};
use crate::domain::DomainError;

const KIND: EntityKind = EntityKind::Role;

/// Role repository wrapper that caches reads and invalidates on writes
///
/// Role membership feeds permission checks, so membership changes clear every
/// cached permission answer.
pub struct CachedRoleRepository<R: RoleRepository> {
    inner: R,
    coordinator: CacheCoordinator,
}

impl<R: RoleRepository> CachedRoleRepository<R> {
    pub fn new(inner: R, coordinator: CacheCoordinator) -> Self {
        Self { inner, coordinator }
    }
}

#[async_trait]
impl<R: RoleRepository> RoleRepository for CachedRoleRepository<R> {
    async fn create(
        &self,
        created_by: &EntityId,
        belongs_to: &EntityId,
        role: Role,
    ) -> Result<Role, DomainError> {
        self.coordinator
            .mutate(
                KIND,
                Operation::Create,
                EvictionArgs::new().parent(belongs_to).related(created_by),
                self.inner.create(created_by, belongs_to, role),
            )
            .await
    }

    async fn get(&self, id: &EntityId) -> Result<Role, DomainError> {
        self.coordinator
            .read_through(entity_key(KIND, id)?, self.inner.get(id))
            .await
    }

    async fn get_all_belongs_to(
        &self,
        belongs_to: &EntityId,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Role>, DomainError> {
        let key = cache_key!(KIND, ReadOp::GetAllBelongsTo, belongs_to, offset, limit);

        self.coordinator
            .read_through(key, self.inner.get_all_belongs_to(belongs_to, offset, limit))
            .await
    }

    async fn add_member(
        &self,
        role: &EntityId,
        member: &EntityId,
        belongs_to: &EntityId,
    ) -> Result<(), DomainError> {
        self.coordinator
            .mutate(
                KIND,
                Operation::AddMember,
                EvictionArgs::new()
                    .subject(role)
                    .related(member)
                    .parent(belongs_to),
                self.inner.add_member(role, member, belongs_to),
            )
            .await
    }

    async fn remove_member(
        &self,
        role: &EntityId,
        member: &EntityId,
        belongs_to: &EntityId,
    ) -> Result<(), DomainError> {
        self.coordinator
            .mutate(
                KIND,
                Operation::RemoveMember,
                EvictionArgs::new()
                    .subject(role)
                    .related(member)
                    .parent(belongs_to),
                self.inner.remove_member(role, member, belongs_to),
            )
            .await
    }

    async fn update(&self, id: &EntityId, patch: &Patch) -> Result<Role, DomainError> {
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
    use crate::domain::cache::MockCache;
    use crate::domain::role::MockRoleRepository;
    use std::sync::Arc;

    fn id(kind: EntityKind, value: &str) -> EntityId {
        EntityId::new(kind, value).unwrap()
    }

    fn wrap(
        repo: MockRoleRepository,
        cache: MockCache,
    ) -> (CachedRoleRepository<MockRoleRepository>, Arc<MockCache>) {
        let cache = Arc::new(cache);
        let coordinator = CacheCoordinator::new(cache.clone());
        (CachedRoleRepository::new(repo, coordinator), cache)
    }

    #[tokio::test]
    async fn test_add_member_clears_permission_answers() {
        let mut repo = MockRoleRepository::new();
        repo.expect_add_member().times(1).returning(|_, _, _| Ok(()));

        let cache = MockCache::new()
            .with_entry("Permission:HasPermission:User:u1:Document:d1:read", &true)
            .with_entry("Role:r1", &"stale")
            .with_entry("User:u1", &"kept");
        let (cached, cache) = wrap(repo, cache);

        cached
            .add_member(
                &id(EntityKind::Role, "r1"),
                &id(EntityKind::User, "u1"),
                &id(EntityKind::Organization, "o1"),
            )
            .await
            .unwrap();

        assert_eq!(
            cache.journal().entries(),
            vec![
                "cache.delete Role:r1",
                "cache.delete_pattern Role:GetAllBelongsTo:*",
                "cache.delete_pattern Permission:*",
            ]
        );
        assert_eq!(cache.keys(), vec!["User:u1"]);
    }

    #[tokio::test]
    async fn test_create_scoped_to_owner() {
        let org = id(EntityKind::Organization, "o1");
        let creator = id(EntityKind::User, "u1");

        let mut repo = MockRoleRepository::new();
        repo.expect_create().times(1).returning(|_, _, role| Ok(role));

        let (cached, cache) = wrap(repo, MockCache::new());

        cached
            .create(&creator, &org, Role::new(org.clone(), creator.clone(), "maintainer"))
            .await
            .unwrap();

        assert_eq!(
            cache.journal().entries(),
            vec![
                "cache.delete_pattern Role:GetAllBelongsTo:Organization:o1:*",
                "cache.delete_pattern Permission:*",
            ]
        );
    }

    #[tokio::test]
    async fn test_listing_served_from_cache() {
        let org = id(EntityKind::Organization, "o1");
        let creator = id(EntityKind::User, "u1");

        let mut repo = MockRoleRepository::new();
        let role = Role::new(org.clone(), creator, "maintainer");
        repo.expect_get_all_belongs_to()
            .times(1)
            .returning(move |_, _, _| Ok(vec![role.clone()]));

        let (cached, _) = wrap(repo, MockCache::new());

        let first = cached.get_all_belongs_to(&org, 0, 25).await.unwrap();
        let second = cached.get_all_belongs_to(&org, 0, 25).await.unwrap();
        assert_eq!(first, second);
    }
}
