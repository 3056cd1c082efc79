//! Cached project repository

use async_trait::async_trait;

use super::coordinator::{entity_key, CacheCoordinator};
use crate::cache_key;
use crate::domain::entity::{EntityId, EntityKind, Patch};
use crate::domain::invalidation::{EvictionArgs, Operation, ReadOp};
use crate::domain::project::{Project, ProjectRepository};
use crate::domain::DomainError;

const KIND: EntityKind = EntityKind::Project;

pub struct CachedProjectRepository<R: ProjectRepository> {
    inner: R,
    coordinator: CacheCoordinator,
}

impl<R: ProjectRepository> CachedProjectRepository<R> {
    pub fn new(inner: R, coordinator: CacheCoordinator) -> Self {
        Self { inner, coordinator }
    }
}

#[async_trait]
impl<R: ProjectRepository> ProjectRepository for CachedProjectRepository<R> {
    async fn create(&self, namespace: &EntityId, project: Project) -> Result<Project, DomainError> {
        self.coordinator
            .mutate(
                KIND,
                Operation::Create,
                EvictionArgs::new().parent(namespace),
                self.inner.create(namespace, project),
            )
            .await
    }

    async fn get(&self, id: &EntityId) -> Result<Project, DomainError> {
        self.coordinator
            .read_through(entity_key(KIND, id)?, self.inner.get(id))
            .await
    }

    async fn get_by_key(&self, key: &str) -> Result<Project, DomainError> {
        self.coordinator
            .read_through(
                cache_key!(KIND, ReadOp::GetByKey, key),
                self.inner.get_by_key(key),
            )
            .await
    }

    async fn get_all(
        &self,
        namespace: &EntityId,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Project>, DomainError> {
        let key = cache_key!(KIND, ReadOp::GetAll, namespace, offset, limit);

        self.coordinator
            .read_through(key, self.inner.get_all(namespace, offset, limit))
            .await
    }

    async fn update(&self, id: &EntityId, patch: &Patch) -> Result<Project, DomainError> {
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
