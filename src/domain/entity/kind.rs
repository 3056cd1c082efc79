//! Entity kinds known to the cache layer

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Label of every entity kind whose reads may be cached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    Attachment,
    Comment,
    Document,
    Issue,
    IssueRelation,
    Label,
    Namespace,
    Organization,
    Project,
    Role,
    Permission,
    Todo,
    User,
    Assignment,
}

impl EntityKind {
    pub const ALL: [EntityKind; 14] = [
        EntityKind::Attachment,
        EntityKind::Comment,
        EntityKind::Document,
        EntityKind::Issue,
        EntityKind::IssueRelation,
        EntityKind::Label,
        EntityKind::Namespace,
        EntityKind::Organization,
        EntityKind::Project,
        EntityKind::Role,
        EntityKind::Permission,
        EntityKind::Todo,
        EntityKind::User,
        EntityKind::Assignment,
    ];

    /// Name used as the first key segment
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Attachment => "Attachment",
            Self::Comment => "Comment",
            Self::Document => "Document",
            Self::Issue => "Issue",
            Self::IssueRelation => "IssueRelation",
            Self::Label => "Label",
            Self::Namespace => "Namespace",
            Self::Organization => "Organization",
            Self::Project => "Project",
            Self::Role => "Role",
            Self::Permission => "Permission",
            Self::Todo => "Todo",
            Self::User => "User",
            Self::Assignment => "Assignment",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for EntityKind {
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
            .find(|kind| kind.as_str().to_lowercase() == normalized)
            .ok_or_else(|| DomainError::validation(format!("Unknown entity kind: {}", s)))
    }
}
