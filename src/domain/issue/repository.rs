//! Issue repository trait

use async_trait::async_trait;

use super::entity::{Issue, IssueRelation, IssueRelationKind};
use crate::domain::entity::{EntityId, Patch};
use crate::domain::user::User;
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Repository for issues, their watchers and their relations
#[cfg_attr(test, automock)]
#[async_trait]
pub trait IssueRepository: Send + Sync {
    async fn create(&self, project: &EntityId, issue: Issue) -> Result<Issue, DomainError>;

    async fn get(&self, id: &EntityId) -> Result<Issue, DomainError>;

    async fn get_all_for_project(
        &self,
        project: &EntityId,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Issue>, DomainError>;

    /// Child issues of one parent issue
    async fn get_all_for_issue(
        &self,
        issue: &EntityId,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Issue>, DomainError>;

    async fn add_watcher(&self, issue: &EntityId, user: &EntityId) -> Result<(), DomainError>;

    async fn get_watchers(&self, issue: &EntityId) -> Result<Vec<User>, DomainError>;

    async fn remove_watcher(&self, issue: &EntityId, user: &EntityId)
        -> Result<(), DomainError>;

    async fn add_relation(&self, relation: &IssueRelation) -> Result<(), DomainError>;

    /// Relations where the issue is either endpoint
    async fn get_relations(&self, issue: &EntityId) -> Result<Vec<IssueRelation>, DomainError>;

    async fn remove_relation(
        &self,
        source: &EntityId,
        target: &EntityId,
        kind: IssueRelationKind,
    ) -> Result<(), DomainError>;

    async fn update(&self, id: &EntityId, patch: &Patch) -> Result<Issue, DomainError>;

    async fn delete(&self, id: &EntityId) -> Result<(), DomainError>;
}
