use serde::Serialize;

use super::operation::ReadOp;
use crate::domain::entity::EntityKind;

/// What a parametric read is keyed by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadScope {
    /// Keyed by the id of the entity it describes, e.g. the watchers of one issue
    Entity,
    /// Keyed by the id of a foreign entity, e.g. the comments of one document
    Association,
    /// Keyed by values only, e.g. paging or a lookup by email
    Query,
}

/// A declared family of cached reads, `<kind>:<read>:<parts...>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ReadShape {
    pub kind: EntityKind,
    pub read: ReadOp,
    pub scope: ReadScope,
}

impl ReadShape {
    pub fn new(kind: EntityKind, read: ReadOp, scope: ReadScope) -> Self {
        Self { kind, read, scope }
    }

    /// Whether the first discriminator is an entity id
    pub fn is_id_scoped(&self) -> bool {
        !matches!(self.scope, ReadScope::Query)
    }
}

impl std::fmt::Display for ReadShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind, self.read)
    }
}
