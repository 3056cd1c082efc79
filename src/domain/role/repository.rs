//! Role repository trait

use async_trait::async_trait;

use super::entity::Role;
use crate::domain::entity::{EntityId, Patch};
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Repository for roles and their membership
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RoleRepository: Send + Sync {
    async fn create(
        &self,
        created_by: &EntityId,
        belongs_to: &EntityId,
        role: Role,
    ) -> Result<Role, DomainError>;

    async fn get(&self, id: &EntityId) -> Result<Role, DomainError>;

    async fn get_all_belongs_to(
        &self,
        belongs_to: &EntityId,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Role>, DomainError>;

    /// Adds a user to the role within the scope it belongs to
    async fn add_member(
        &self,
        role: &EntityId,
        member: &EntityId,
        belongs_to: &EntityId,
    ) -> Result<(), DomainError>;

    async fn remove_member(
        &self,
        role: &EntityId,
        member: &EntityId,
        belongs_to: &EntityId,
    ) -> Result<(), DomainError>;

    async fn update(&self, id: &EntityId, patch: &Patch) -> Result<Role, DomainError>;

    async fn delete(&self, id: &EntityId) -> Result<(), DomainError>;
}
