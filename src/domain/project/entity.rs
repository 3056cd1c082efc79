//! Project entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entity::{EntityId, EntityKind};

/// A project inside a namespace, addressable by a short unique key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: EntityId,
    pub namespace: EntityId,
    /// Short unique key, e.g. `CORE`
    pub key: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn new(namespace: EntityId, key: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: EntityId::generate(EntityKind::Project),
            namespace,
            key: key.into(),
            name: name.into(),
            created_at: now,
            updated_at: now,
        }
    }
}
