//! Issue entity, watchers and relations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entity::{EntityId, EntityKind};

/// Workflow state of an issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
    #[default]
    Open,
    InProgress,
    Done,
    Closed,
}

/// A unit of work inside a project, optionally nested under a parent issue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub id: EntityId,
    pub project: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<EntityId>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: IssueStatus,
    #[serde(default)]
    pub labels: Vec<EntityId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Issue {
    pub fn new(project: EntityId, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: EntityId::generate(EntityKind::Issue),
            project,
            parent: None,
            title: title.into(),
            description: String::new(),
            status: IssueStatus::default(),
            labels: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_parent(mut self, parent: EntityId) -> Self {
        self.parent = Some(parent);
        self
    }
}

/// How the source of a relation refers to its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueRelationKind {
    Subtask,
    Blocks,
    DependsOn,
    Duplicates,
    RelatedTo,
    Mentions,
}

/// Directed edge between an issue and another issue or a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueRelation {
    pub id: EntityId,
    pub source: EntityId,
    pub target: EntityId,
    pub kind: IssueRelationKind,
    pub created_at: DateTime<Utc>,
}

impl IssueRelation {
    pub fn new(source: EntityId, target: EntityId, kind: IssueRelationKind) -> Self {
        Self {
            id: EntityId::generate(EntityKind::IssueRelation),
            source,
            target,
            kind,
            created_at: Utc::now(),
        }
    }
}
