//! Cached label repository

use async_trait::async_trait;

use super::coordinator::{entity_key, CacheCoordinator};
use crate::cache_key;
use crate::domain::entity::{EntityId, EntityKind, Patch};
use crate::domain::invalidation::{EvictionArgs, Operation, ReadOp};
use crate::domain::label::{Label, LabelRepository};
use crate::domain::DomainError;

const KIND: EntityKind = EntityKind::Label;

/// Label repository wrapper that caches reads and invalidates on writes
///
/// Labels are embedded in documents and issues. Attaching or detaching only
/// touches the labelled entity; renaming or deleting a label clears every
/// cached document and issue.
pub struct CachedLabelRepository<R: LabelRepository> {
    inner: R,
    coordinator: CacheCoordinator,
}

impl<R: LabelRepository> CachedLabelRepository<R> {
    pub fn new(inner: R, coordinator: CacheCoordinator) -> Self {
        Self { inner, coordinator }
    }
}

#[async_trait]
impl<R: LabelRepository> LabelRepository for CachedLabelRepository<R> {
    async fn create(&self, label: Label) -> Result<Label, DomainError> {
        self.coordinator
            .mutate(
                KIND,
                Operation::Create,
                EvictionArgs::new(),
                self.inner.create(label),
            )
            .await
    }

    async fn get(&self, id: &EntityId) -> Result<Label, DomainError> {
        self.coordinator
            .read_through(entity_key(KIND, id)?, self.inner.get(id))
            .await
    }

    async fn get_all(&self, offset: usize, limit: usize) -> Result<Vec<Label>, DomainError> {
        self.coordinator
            .read_through(
                cache_key!(KIND, ReadOp::GetAll, offset, limit),
                self.inner.get_all(offset, limit),
            )
            .await
    }

    async fn update(&self, id: &EntityId, patch: &Patch) -> Result<Label, DomainError> {
        self.coordinator
            .update(KIND, id, self.inner.update(id, patch))
            .await
    }

    async fn attach_to(&self, label: &EntityId, target: &EntityId) -> Result<(), DomainError> {
        self.coordinator
            .mutate(
                KIND,
                Operation::AttachTo,
                EvictionArgs::new().subject(label).related(target),
                self.inner.attach_to(label, target),
            )
            .await
    }

    async fn detach_from(&self, label: &EntityId, target: &EntityId) -> Result<(), DomainError> {
        self.coordinator
            .mutate(
                KIND,
                Operation::DetachFrom,
                EvictionArgs::new().subject(label).related(target),
                self.inner.detach_from(label, target),
            )
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
