//! Cached namespace repository

use async_trait::async_trait;

use super::coordinator::{entity_key, CacheCoordinator};
use crate::cache_key;
use crate::domain::entity::{EntityId, EntityKind, Patch};
use crate::domain::invalidation::{EvictionArgs, Operation, ReadOp};
use crate::domain::namespace::{Namespace, NamespaceRepository};
use crate::domain::DomainError;

const KIND: EntityKind = EntityKind::Namespace;

pub struct CachedNamespaceRepository<R: NamespaceRepository> {
    inner: R,
    coordinator: CacheCoordinator,
}

impl<R: NamespaceRepository> CachedNamespaceRepository<R> {
    pub fn new(inner: R, coordinator: CacheCoordinator) -> Self {
        Self { inner, coordinator }
    }
}

#[async_trait]
impl<R: NamespaceRepository> NamespaceRepository for CachedNamespaceRepository<R> {
    async fn create(
        &self,
        organization: &EntityId,
        namespace: Namespace,
    ) -> Result<Namespace, DomainError> {
        self.coordinator
            .mutate(
                KIND,
                Operation::Create,
                EvictionArgs::new().parent(organization),
                self.inner.create(organization, namespace),
            )
            .await
    }

    async fn get(&self, id: &EntityId) -> Result<Namespace, DomainError> {
        self.coordinator
            .read_through(entity_key(KIND, id)?, self.inner.get(id))
            .await
    }

    async fn get_all(
        &self,
        organization: &EntityId,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Namespace>, DomainError> {
        let key = cache_key!(KIND, ReadOp::GetAll, organization, offset, limit);

        self.coordinator
            .read_through(key, self.inner.get_all(organization, offset, limit))
            .await
    }

    async fn update(&self, id: &EntityId, patch: &Patch) -> Result<Namespace, DomainError> {
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
