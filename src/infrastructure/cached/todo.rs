//! Cached todo repository

use async_trait::async_trait;

use super::coordinator::{entity_key, CacheCoordinator};
use crate::cache_key;
use crate::domain::entity::{EntityId, EntityKind, Patch};
use crate::domain::invalidation::{EvictionArgs, Operation, ReadOp};
use crate::domain::todo::{Todo, TodoRepository};
use crate::domain::DomainError;

const KIND: EntityKind = EntityKind::Todo;

/// Key segment for the completion filter of an owner listing
fn completion_filter(completed: Option<bool>) -> &'static str {
    match completed {
        None => "all",
        Some(false) => "open",
        Some(true) => "completed",
    }
}

pub struct CachedTodoRepository<R: TodoRepository> {
    inner: R,
    coordinator: CacheCoordinator,
}

impl<R: TodoRepository> CachedTodoRepository<R> {
    pub fn new(inner: R, coordinator: CacheCoordinator) -> Self {
        Self { inner, coordinator }
    }
}

#[async_trait]
impl<R: TodoRepository> TodoRepository for CachedTodoRepository<R> {
    async fn create(&self, todo: Todo) -> Result<Todo, DomainError> {
        let owner = todo.owner.clone();

        self.coordinator
            .mutate(
                KIND,
                Operation::Create,
                EvictionArgs::new().parent(&owner),
                self.inner.create(todo),
            )
            .await
    }

    async fn get(&self, id: &EntityId) -> Result<Todo, DomainError> {
        self.coordinator
            .read_through(entity_key(KIND, id)?, self.inner.get(id))
            .await
    }

    async fn get_by_owner(
        &self,
        owner: &EntityId,
        completed: Option<bool>,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Todo>, DomainError> {
        let key = cache_key!(
            KIND,
            ReadOp::GetByOwner,
            owner,
            completion_filter(completed),
            offset,
            limit
        );

        self.coordinator
            .read_through(
                key,
                self.inner.get_by_owner(owner, completed, offset, limit),
            )
            .await
    }

    async fn update(&self, id: &EntityId, patch: &Patch) -> Result<Todo, DomainError> {
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
