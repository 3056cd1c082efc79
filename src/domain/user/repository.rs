//! User repository trait

use async_trait::async_trait;

use super::entity::User;
use crate::domain::entity::{EntityId, Patch};
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Repository trait for user storage
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user
    async fn create(&self, user: User) -> Result<User, DomainError>;

    /// Get a user by their ID
    async fn get(&self, id: &EntityId) -> Result<User, DomainError>;

    /// Get a user by their email address
    async fn get_by_email(&self, email: &str) -> Result<User, DomainError>;

    /// List users page by page
    async fn get_all(&self, offset: usize, limit: usize) -> Result<Vec<User>, DomainError>;

    /// Update an existing user
    async fn update(&self, id: &EntityId, patch: &Patch) -> Result<User, DomainError>;

    /// Delete a user
    async fn delete(&self, id: &EntityId) -> Result<(), DomainError>;
}
