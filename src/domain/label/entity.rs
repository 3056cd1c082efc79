//! Label entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entity::{EntityId, EntityKind};

/// A tag that can be attached to documents and issues
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub id: EntityId,
    pub name: String,
    /// Hex color, e.g. `#d73a4a`
    pub color: String,
    pub created_at: DateTime<Utc>,
}

impl Label {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: EntityId::generate(EntityKind::Label),
            name: name.into(),
            color: color.into(),
            created_at: Utc::now(),
        }
    }
}
