//! Cached organization repository

use async_trait::async_trait;

use super::coordinator::{entity_key, CacheCoordinator};
use crate::cache_key;
use crate::domain::entity::{EntityId, EntityKind, Patch};
use crate::domain::invalidation::{EvictionArgs, Operation, ReadOp};
use crate::domain::organization::{Organization, OrganizationRepository};
use crate::domain::user::User;
use crate::domain::DomainError;

const KIND: EntityKind = EntityKind::Organization;

pub struct CachedOrganizationRepository<R: OrganizationRepository> {
    inner: R,
    coordinator: CacheCoordinator,
}

impl<R: OrganizationRepository> CachedOrganizationRepository<R> {
    pub fn new(inner: R, coordinator: CacheCoordinator) -> Self {
        Self { inner, coordinator }
    }
}

#[async_trait]
impl<R: OrganizationRepository> OrganizationRepository for CachedOrganizationRepository<R> {
    async fn create(
        &self,
        owner: &EntityId,
        organization: Organization,
    ) -> Result<Organization, DomainError> {
        self.coordinator
            .mutate(
                KIND,
                Operation::Create,
                EvictionArgs::new().related(owner),
                self.inner.create(owner, organization),
            )
            .await
    }

    async fn get(&self, id: &EntityId) -> Result<Organization, DomainError> {
        self.coordinator
            .read_through(entity_key(KIND, id)?, self.inner.get(id))
            .await
    }

    async fn get_all(
        &self,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Organization>, DomainError> {
        self.coordinator
            .read_through(
                cache_key!(KIND, ReadOp::GetAll, offset, limit),
                self.inner.get_all(offset, limit),
            )
            .await
    }

    async fn add_member(
        &self,
        organization: &EntityId,
        user: &EntityId,
    ) -> Result<(), DomainError> {
        self.coordinator
            .mutate(
                KIND,
                Operation::AddMember,
                EvictionArgs::new().subject(organization).related(user),
                self.inner.add_member(organization, user),
            )
            .await
    }

    async fn get_members(&self, organization: &EntityId) -> Result<Vec<User>, DomainError> {
        self.coordinator
            .read_through(
                cache_key!(KIND, ReadOp::GetMembers, organization),
                self.inner.get_members(organization),
            )
            .await
    }

    async fn remove_member(
        &self,
        organization: &EntityId,
        user: &EntityId,
    ) -> Result<(), DomainError> {
        self.coordinator
            .mutate(
                KIND,
                Operation::RemoveMember,
                EvictionArgs::new().subject(organization).related(user),
                self.inner.remove_member(organization, user),
            )
            .await
    }

    async fn update(&self, id: &EntityId, patch: &Patch) -> Result<Organization, DomainError> {
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
