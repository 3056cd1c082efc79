//! Comment entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entity::{EntityId, EntityKind};

/// A comment on a document or an issue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: EntityId,
    pub belongs_to: EntityId,
    pub author: EntityId,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(belongs_to: EntityId, author: EntityId, content: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: EntityId::generate(EntityKind::Comment),
            belongs_to,
            author,
            content: content.into(),
            created_at: now,
            updated_at: now,
        }
    }
}
