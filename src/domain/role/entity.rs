//! Role entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entity::{EntityId, EntityKind};

/// A named set of members within an organization or project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub id: EntityId,
    pub belongs_to: EntityId,
    pub created_by: EntityId,
    pub name: String,
    #[serde(default)]
    pub members: Vec<EntityId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Role {
    pub fn new(belongs_to: EntityId, created_by: EntityId, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: EntityId::generate(EntityKind::Role),
            belongs_to,
            created_by,
            name: name.into(),
            members: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}
