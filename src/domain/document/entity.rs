//! Document entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entity::{EntityId, EntityKind};

/// A document stored under a namespace or a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: EntityId,
    pub belongs_to: EntityId,
    pub created_by: EntityId,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub labels: Vec<EntityId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    pub fn new(belongs_to: EntityId, created_by: EntityId, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: EntityId::generate(EntityKind::Document),
            belongs_to,
            created_by,
            title: title.into(),
            content: String::new(),
            labels: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}
