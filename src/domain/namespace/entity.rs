//! Namespace entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entity::{EntityId, EntityKind};

/// Grouping of projects and documents inside an organization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Namespace {
    pub id: EntityId,
    pub organization: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Namespace {
    pub fn new(organization: EntityId, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: EntityId::generate(EntityKind::Namespace),
            organization,
            name: name.into(),
            description: String::new(),
            created_at: now,
            updated_at: now,
        }
    }
}
