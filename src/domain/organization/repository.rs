//! Organization repository trait

use async_trait::async_trait;

use super::entity::Organization;
use crate::domain::entity::{EntityId, Patch};
use crate::domain::user::User;
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Repository for organizations and their members
#[cfg_attr(test, automock)]
#[async_trait]
pub trait OrganizationRepository: Send + Sync {
    async fn create(
        &self,
        owner: &EntityId,
        organization: Organization,
    ) -> Result<Organization, DomainError>;

    async fn get(&self, id: &EntityId) -> Result<Organization, DomainError>;

    async fn get_all(&self, offset: usize, limit: usize)
        -> Result<Vec<Organization>, DomainError>;

    async fn add_member(
        &self,
        organization: &EntityId,
        user: &EntityId,
    ) -> Result<(), DomainError>;

    async fn get_members(&self, organization: &EntityId) -> Result<Vec<User>, DomainError>;

    async fn remove_member(
        &self,
        organization: &EntityId,
        user: &EntityId,
    ) -> Result<(), DomainError>;

    async fn update(&self, id: &EntityId, patch: &Patch) -> Result<Organization, DomainError>;

    async fn delete(&self, id: &EntityId) -> Result<(), DomainError>;
}
