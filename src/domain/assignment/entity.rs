//! Assignment entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entity::{EntityId, EntityKind};

/// Capacity in which a user is assigned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentKind {
    #[default]
    Assignee,
    Reviewer,
}

/// A user assigned to a document or an issue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: EntityId,
    pub user: EntityId,
    /// Document or issue the user is assigned to
    pub resource: EntityId,
    #[serde(default)]
    pub kind: AssignmentKind,
    pub created_at: DateTime<Utc>,
}

impl Assignment {
    pub fn new(user: EntityId, resource: EntityId, kind: AssignmentKind) -> Self {
        Self {
            id: EntityId::generate(EntityKind::Assignment),
            user,
            resource,
            kind,
            created_at: Utc::now(),
        }
    }
}
