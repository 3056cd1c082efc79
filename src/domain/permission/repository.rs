//! Permission repository trait

use async_trait::async_trait;

use super::entity::{Permission, PermissionKind, SystemRole};
use crate::domain::entity::EntityId;
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Repository for permission grants and access checks
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PermissionRepository: Send + Sync {
    async fn create(&self, permission: Permission) -> Result<Permission, DomainError>;

    async fn get(&self, id: &EntityId) -> Result<Permission, DomainError>;

    async fn get_by_subject(&self, subject: &EntityId) -> Result<Vec<Permission>, DomainError>;

    async fn get_by_target(&self, target: &EntityId) -> Result<Vec<Permission>, DomainError>;

    async fn get_by_subject_and_target(
        &self,
        subject: &EntityId,
        target: &EntityId,
    ) -> Result<Vec<Permission>, DomainError>;

    /// Whether the subject holds any of `kinds` on the target
    async fn has_permission(
        &self,
        subject: &EntityId,
        target: &EntityId,
        kinds: &[PermissionKind],
    ) -> Result<bool, DomainError>;

    async fn has_any_relation(
        &self,
        subject: &EntityId,
        target: &EntityId,
    ) -> Result<bool, DomainError>;

    async fn has_system_role(
        &self,
        subject: &EntityId,
        roles: &[SystemRole],
    ) -> Result<bool, DomainError>;

    /// Changes the granted access level
    async fn update(&self, id: &EntityId, kind: PermissionKind)
        -> Result<Permission, DomainError>;

    async fn delete(&self, id: &EntityId) -> Result<(), DomainError>;
}
