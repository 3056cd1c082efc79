//! Mutating operations and cached read operations

use serde::{Deserialize, Serialize};

use crate::domain::cache::KeyPart;
use crate::domain::DomainError;

/// A mutating repository operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Operation {
    Create,
    Update,
    Delete,
    AddWatcher,
    RemoveWatcher,
    AddRelation,
    RemoveRelation,
    AttachTo,
    DetachFrom,
    AddMember,
    RemoveMember,
}

impl Operation {
    pub const ALL: [Operation; 11] = [
        Operation::Create,
        Operation::Update,
        Operation::Delete,
        Operation::AddWatcher,
        Operation::RemoveWatcher,
        Operation::AddRelation,
        Operation::RemoveRelation,
        Operation::AttachTo,
        Operation::DetachFrom,
        Operation::AddMember,
        Operation::RemoveMember,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "Create",
            Self::Update => "Update",
            Self::Delete => "Delete",
            Self::AddWatcher => "AddWatcher",
            Self::RemoveWatcher => "RemoveWatcher",
            Self::AddRelation => "AddRelation",
            Self::RemoveRelation => "RemoveRelation",
            Self::AttachTo => "AttachTo",
            Self::DetachFrom => "DetachFrom",
            Self::AddMember => "AddMember",
            Self::RemoveMember => "RemoveMember",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Operation {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();

        Self::ALL
            .iter()
            .copied()
            .find(|op| op.as_str().to_lowercase() == normalized)
            .ok_or_else(|| DomainError::validation(format!("Unknown operation: {}", s)))
    }
}

/// A cached parametric read, named in the second key segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ReadOp {
    GetAll,
    GetAllBelongsTo,
    GetAllForProject,
    GetAllForIssue,
    GetByCreator,
    GetByKey,
    GetByEmail,
    GetByOwner,
    GetBySubject,
    GetByTarget,
    GetBySubjectAndTarget,
    GetByUser,
    GetByResource,
    GetMembers,
    GetWatchers,
    GetRelations,
    HasPermission,
    HasAnyRelation,
    HasSystemRole,
}

impl ReadOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GetAll => "GetAll",
            Self::GetAllBelongsTo => "GetAllBelongsTo",
            Self::GetAllForProject => "GetAllForProject",
            Self::GetAllForIssue => "GetAllForIssue",
            Self::GetByCreator => "GetByCreator",
            Self::GetByKey => "GetByKey",
            Self::GetByEmail => "GetByEmail",
            Self::GetByOwner => "GetByOwner",
            Self::GetBySubject => "GetBySubject",
            Self::GetByTarget => "GetByTarget",
            Self::GetBySubjectAndTarget => "GetBySubjectAndTarget",
            Self::GetByUser => "GetByUser",
            Self::GetByResource => "GetByResource",
            Self::GetMembers => "GetMembers",
            Self::GetWatchers => "GetWatchers",
            Self::GetRelations => "GetRelations",
            Self::HasPermission => "HasPermission",
            Self::HasAnyRelation => "HasAnyRelation",
            Self::HasSystemRole => "HasSystemRole",
        }
    }
}

impl std::fmt::Display for ReadOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ReadOp> for KeyPart {
    fn from(read: ReadOp) -> Self {
        KeyPart::Str(read.as_str().to_string())
    }
}
