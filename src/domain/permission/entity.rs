//! Permission entity and the access levels it grants

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entity::{EntityId, EntityKind};
use crate::domain::DomainError;

/// Access level granted by a permission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionKind {
    Read,
    Write,
    Admin,
    Owner,
}

impl PermissionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::Admin => "admin",
            Self::Owner => "owner",
        }
    }
}

impl std::str::FromStr for PermissionKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "read" => Ok(Self::Read),
            "write" => Ok(Self::Write),
            "admin" => Ok(Self::Admin),
            "owner" => Ok(Self::Owner),
            _ => Err(DomainError::validation(format!(
                "Unknown permission kind: {}",
                s
            ))),
        }
    }
}

/// Installation-wide role of a user, independent of any target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemRole {
    Owner,
    Admin,
    Support,
    Member,
}

impl SystemRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Admin => "admin",
            Self::Support => "support",
            Self::Member => "member",
        }
    }
}

/// Grant of one access level from a subject (user or role) to a target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Permission {
    pub id: EntityId,
    pub subject: EntityId,
    pub target: EntityId,
    pub kind: PermissionKind,
    pub created_at: DateTime<Utc>,
}

impl Permission {
    pub fn new(subject: EntityId, target: EntityId, kind: PermissionKind) -> Self {
        Self {
            id: EntityId::generate(EntityKind::Permission),
            subject,
            target,
            kind,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_kind_round_trips_through_str() {
        for kind in [
            PermissionKind::Read,
            PermissionKind::Write,
            PermissionKind::Admin,
            PermissionKind::Owner,
        ] {
            assert_eq!(kind.as_str().parse::<PermissionKind>().unwrap(), kind);
        }
        assert!("superuser".parse::<PermissionKind>().is_err());
    }
}
