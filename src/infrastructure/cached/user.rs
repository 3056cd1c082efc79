//! Cached user repository

use async_trait::async_trait;

use super::coordinator::{entity_key, CacheCoordinator};
use crate::cache_key;
use crate::domain::entity::{EntityId, EntityKind, Patch};
use crate::domain::invalidation::{EvictionArgs, Operation, ReadOp};
use crate::domain::user::{User, UserRepository};
use crate::domain::DomainError;

const KIND: EntityKind = EntityKind::User;

/// User repository wrapper that caches reads and invalidates on writes
///
/// Users are embedded in member and watcher listings of other kinds, and a
/// deleted user takes its todos, assignments, roles and grants with it.
pub struct CachedUserRepository<R: UserRepository> {
    inner: R,
    coordinator: CacheCoordinator,
}

impl<R: UserRepository> CachedUserRepository<R> {
    pub fn new(inner: R, coordinator: CacheCoordinator) -> Self {
        Self { inner, coordinator }
    }
}

#[async_trait]
impl<R: UserRepository> UserRepository for CachedUserRepository<R> {
    async fn create(&self, user: User) -> Result<User, DomainError> {
        self.coordinator
            .mutate(
                KIND,
                Operation::Create,
                EvictionArgs::new(),
                self.inner.create(user),
            )
            .await
    }

    async fn get(&self, id: &EntityId) -> Result<User, DomainError> {
        self.coordinator
            .read_through(entity_key(KIND, id)?, self.inner.get(id))
            .await
    }

    async fn get_by_email(&self, email: &str) -> Result<User, DomainError> {
        self.coordinator
            .read_through(
                cache_key!(KIND, ReadOp::GetByEmail, email),
                self.inner.get_by_email(email),
            )
            .await
    }

    async fn get_all(&self, offset: usize, limit: usize) -> Result<Vec<User>, DomainError> {
        self.coordinator
            .read_through(
                cache_key!(KIND, ReadOp::GetAll, offset, limit),
                self.inner.get_all(offset, limit),
            )
            .await
    }

    async fn update(&self, id: &EntityId, patch: &Patch) -> Result<User, DomainError> {
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
