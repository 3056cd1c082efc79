//! Typed entity identifiers

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::kind::EntityKind;
use crate::domain::DomainError;

const MAX_ID_LENGTH: usize = 128;

/// Errors that can occur while building an [`EntityId`]
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EntityIdError {
    #[error("Entity ID cannot be empty")]
    Empty,

    #[error("Entity ID cannot exceed {0} characters")]
    TooLong(usize),

    #[error("Entity ID cannot contain '{0}'")]
    ForbiddenCharacter(char),

    #[error("Entity ID '{0}' must have the form Kind:value")]
    MissingKind(String),

    #[error("Unknown entity kind '{0}'")]
    UnknownKind(String),
}

impl From<EntityIdError> for DomainError {
    fn from(err: EntityIdError) -> Self {
        DomainError::invalid_id(err.to_string())
    }
}

/// Identifier of an entity: a kind tag plus an opaque value
///
/// The value never contains the key separator or the wildcard token, so it can
/// be embedded in cache keys as a single segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityId {
    kind: EntityKind,
    value: String,
}

impl EntityId {
    pub fn new(kind: EntityKind, value: impl Into<String>) -> Result<Self, EntityIdError> {
        let value = value.into();
        validate_id_value(&value)?;
        Ok(Self { kind, value })
    }

    /// Issue a fresh random identifier
    pub fn generate(kind: EntityKind) -> Self {
        Self {
            kind,
            value: uuid::Uuid::new_v4().simple().to_string(),
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// The opaque part of the identifier
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is(&self, kind: EntityKind) -> bool {
        self.kind == kind
    }
}

fn validate_id_value(value: &str) -> Result<(), EntityIdError> {
    if value.is_empty() {
        return Err(EntityIdError::Empty);
    }

    if value.len() > MAX_ID_LENGTH {
        return Err(EntityIdError::TooLong(MAX_ID_LENGTH));
    }

    if let Some(c) = value.chars().find(|c| matches!(c, ':' | '*') || c.is_whitespace()) {
        return Err(EntityIdError::ForbiddenCharacter(c));
    }

    Ok(())
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind, self.value)
    }
}

impl std::str::FromStr for EntityId {
    type Err = EntityIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, value) = s
            .split_once(':')
            .ok_or_else(|| EntityIdError::MissingKind(s.to_string()))?;

        let kind = kind
            .parse::<EntityKind>()
            .map_err(|_| EntityIdError::UnknownKind(kind.to_string()))?;

        Self::new(kind, value)
    }
}

impl TryFrom<String> for EntityId {
    type Error = EntityIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EntityId> for String {
    fn from(id: EntityId) -> Self {
        id.to_string()
    }
}
