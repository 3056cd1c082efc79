//! Attachment entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entity::{EntityId, EntityKind};

/// A file attached to a document or an issue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: EntityId,
    /// Document or issue holding the file
    pub belongs_to: EntityId,
    pub name: String,
    pub content_type: String,
    pub size: u64,
    pub created_by: EntityId,
    pub created_at: DateTime<Utc>,
}

impl Attachment {
    pub fn new(belongs_to: EntityId, created_by: EntityId, name: impl Into<String>) -> Self {
        Self {
            id: EntityId::generate(EntityKind::Attachment),
            belongs_to,
            name: name.into(),
            content_type: "application/octet-stream".to_string(),
            size: 0,
            created_by,
            created_at: Utc::now(),
        }
    }

    pub fn with_content(mut self, content_type: impl Into<String>, size: u64) -> Self {
        self.content_type = content_type.into();
        self.size = size;
        self
    }
}
