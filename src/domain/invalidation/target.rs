//! Invalidation targets and their resolution against call arguments

use super::operation::ReadOp;
use super::shape::{ReadScope, ReadShape};
use crate::domain::cache::{CacheKey, CachePattern, KeyPart};
use crate::domain::entity::{EntityId, EntityKind};
use crate::domain::DomainError;

/// Which call argument a target reads its id from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// The entity being mutated
    Subject,
    /// The owner the entity is created under
    Parent,
    /// The other side of a relational mutation
    Related,
    /// Like `Parent`, but the target is skipped when absent
    ParentIfAny,
    /// Like `Related`, but the target is skipped when absent
    RelatedIfAny,
}

impl Slot {
    fn resolve<'a>(&self, args: &EvictionArgs<'a>) -> Result<Option<&'a EntityId>, DomainError> {
        let (value, name) = match self {
            Self::Subject => (args.subject, "subject"),
            Self::Parent => (args.parent, "parent"),
            Self::Related => (args.related, "related"),
            Self::ParentIfAny => return Ok(args.parent),
            Self::RelatedIfAny => return Ok(args.related),
        };

        value
            .map(Some)
            .ok_or_else(|| DomainError::internal(format!("Missing {} argument for eviction", name)))
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Subject => "{subject}",
            Self::Parent => "{parent}",
            Self::Related => "{related}",
            Self::ParentIfAny => "{parent?}",
            Self::RelatedIfAny => "{related?}",
        }
    }
}

/// Ids a mutation makes available to its eviction targets
#[derive(Debug, Clone, Copy, Default)]
pub struct EvictionArgs<'a> {
    pub subject: Option<&'a EntityId>,
    pub parent: Option<&'a EntityId>,
    pub related: Option<&'a EntityId>,
}

impl<'a> EvictionArgs<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subject(mut self, id: &'a EntityId) -> Self {
        self.subject = Some(id);
        self
    }

    pub fn parent(mut self, id: &'a EntityId) -> Self {
        self.parent = Some(id);
        self
    }

    pub fn related(mut self, id: &'a EntityId) -> Self {
        self.related = Some(id);
        self
    }

    pub fn maybe_parent(mut self, id: Option<&'a EntityId>) -> Self {
        self.parent = id;
        self
    }

    pub fn maybe_related(mut self, id: Option<&'a EntityId>) -> Self {
        self.related = id;
        self
    }
}

/// One concrete cache deletion
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Eviction {
    Key(CacheKey),
    Pattern(CachePattern),
}

impl Eviction {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Key(key) => key.kind(),
            Self::Pattern(pattern) => pattern.kind(),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Key(key) => key.as_str(),
            Self::Pattern(pattern) => pattern.as_str(),
        }
    }
}

impl std::fmt::Display for Eviction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Key(key) => write!(f, "key {}", key),
            Self::Pattern(pattern) => write!(f, "pattern {}", pattern),
        }
    }
}

/// A declarative eviction, resolved against call arguments at plan time
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Per-id key of `kind`; the slot id must be of that kind
    Key { kind: EntityKind, slot: Slot },
    /// Per-id key of whatever the slot id names, when its kind is allowed
    KeyOf {
        slot: Slot,
        allowed: &'static [EntityKind],
    },
    /// `<kind>:<read>:<id>:*`
    Scoped {
        kind: EntityKind,
        read: ReadOp,
        slot: Slot,
    },
    /// `<kind>:<read>:*`
    Listing { kind: EntityKind, read: ReadOp },
    /// Every parametric listing of the slot id's kind, when that kind is allowed
    ListingsOf {
        slot: Slot,
        allowed: &'static [EntityKind],
    },
    /// `<kind>:*`
    Blanket { kind: EntityKind },
    /// `<kind of slot id>:*`, when that kind is allowed
    BlanketOf {
        slot: Slot,
        allowed: &'static [EntityKind],
    },
}

impl Target {
    /// Per-id key of the mutated entity
    pub fn key(kind: EntityKind) -> Self {
        Self::Key {
            kind,
            slot: Slot::Subject,
        }
    }

    pub fn key_of(slot: Slot, allowed: &'static [EntityKind]) -> Self {
        Self::KeyOf { slot, allowed }
    }

    pub fn scoped(kind: EntityKind, read: ReadOp, slot: Slot) -> Self {
        Self::Scoped { kind, read, slot }
    }

    pub fn listing(kind: EntityKind, read: ReadOp) -> Self {
        Self::Listing { kind, read }
    }

    pub fn listings_of(slot: Slot, allowed: &'static [EntityKind]) -> Self {
        Self::ListingsOf { slot, allowed }
    }

    pub fn blanket(kind: EntityKind) -> Self {
        Self::Blanket { kind }
    }

    pub fn blanket_of(slot: Slot, allowed: &'static [EntityKind]) -> Self {
        Self::BlanketOf { slot, allowed }
    }

    /// The declared read this target names, if any
    pub(crate) fn named_read(&self) -> Option<(EntityKind, ReadOp)> {
        match self {
            Self::Scoped { kind, read, .. } | Self::Listing { kind, read } => Some((*kind, *read)),
            _ => None,
        }
    }

    /// Kinds whose cached values this target may remove
    pub fn touched_kinds(&self) -> Vec<EntityKind> {
        match self {
            Self::Key { kind, .. }
            | Self::Scoped { kind, .. }
            | Self::Listing { kind, .. }
            | Self::Blanket { kind } => vec![*kind],
            Self::KeyOf { allowed, .. }
            | Self::ListingsOf { allowed, .. }
            | Self::BlanketOf { allowed, .. } => allowed.to_vec(),
        }
    }

    /// Whether this target can remove values of the given read shape
    pub fn covers_read(&self, shape: &ReadShape) -> bool {
        match self {
            Self::Key { .. } | Self::KeyOf { .. } => false,
            Self::Scoped { kind, read, .. } | Self::Listing { kind, read } => {
                *kind == shape.kind && *read == shape.read
            }
            Self::ListingsOf { allowed, .. } => {
                allowed.contains(&shape.kind) && shape.scope != ReadScope::Entity
            }
            Self::Blanket { kind } => *kind == shape.kind,
            Self::BlanketOf { allowed, .. } => allowed.contains(&shape.kind),
        }
    }

    /// Whether this target can remove per-id values of the given kind
    pub fn covers_entity(&self, kind: EntityKind) -> bool {
        match self {
            Self::Key { kind: k, .. } | Self::Blanket { kind: k } => *k == kind,
            Self::KeyOf { allowed, .. } | Self::BlanketOf { allowed, .. } => allowed.contains(&kind),
            Self::Scoped { .. } | Self::Listing { .. } | Self::ListingsOf { .. } => false,
        }
    }

    /// Appends the concrete evictions for these arguments.
    ///
    /// `shapes` are the declared reads, consulted by `ListingsOf`.
    pub fn resolve(
        &self,
        args: &EvictionArgs<'_>,
        shapes: &[ReadShape],
        out: &mut Vec<Eviction>,
    ) -> Result<(), DomainError> {
        match self {
            Self::Key { kind, slot } => {
                if let Some(id) = slot.resolve(args)? {
                    if !id.is(*kind) {
                        return Err(DomainError::invalid_id(format!(
                            "Expected {} id, got {}",
                            kind, id
                        )));
                    }
                    out.push(Eviction::Key(CacheKey::for_entity(id)));
                }
            }
            Self::KeyOf { slot, allowed } => {
                if let Some(id) = slot.resolve(args)?.filter(|id| allowed.contains(&id.kind())) {
                    out.push(Eviction::Key(CacheKey::for_entity(id)));
                }
            }
            Self::Scoped { kind, read, slot } => {
                if let Some(id) = slot.resolve(args)? {
                    out.push(Eviction::Pattern(CachePattern::compose(
                        *kind,
                        [KeyPart::from(*read), KeyPart::from(id)],
                    )));
                }
            }
            Self::Listing { kind, read } => {
                out.push(Eviction::Pattern(CachePattern::compose(
                    *kind,
                    [KeyPart::from(*read)],
                )));
            }
            Self::ListingsOf { slot, allowed } => {
                if let Some(id) = slot.resolve(args)?.filter(|id| allowed.contains(&id.kind())) {
                    out.extend(
                        shapes
                            .iter()
                            .filter(|s| s.kind == id.kind() && s.scope != ReadScope::Entity)
                            .map(|s| {
                                Eviction::Pattern(CachePattern::compose(
                                    s.kind,
                                    [KeyPart::from(s.read)],
                                ))
                            }),
                    );
                }
            }
            Self::Blanket { kind } => {
                out.push(Eviction::Pattern(CachePattern::all(*kind)));
            }
            Self::BlanketOf { slot, allowed } => {
                if let Some(id) = slot.resolve(args)?.filter(|id| allowed.contains(&id.kind())) {
                    out.push(Eviction::Pattern(CachePattern::all(id.kind())));
                }
            }
        }

        Ok(())
    }
}

fn join_kinds(kinds: &[EntityKind]) -> String {
    kinds
        .iter()
        .map(EntityKind::as_str)
        .collect::<Vec<_>>()
        .join("|")
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Key { kind, slot } => write!(f, "Key({}, {})", kind, slot.name()),
            Self::KeyOf { slot, allowed } => {
                write!(f, "Key({} if {})", slot.name(), join_kinds(allowed))
            }
            Self::Scoped { kind, read, slot } => {
                write!(f, "Pattern({}, {}, {}, *)", kind, read, slot.name())
            }
            Self::Listing { kind, read } => write!(f, "Pattern({}, {}, *)", kind, read),
            Self::ListingsOf { slot, allowed } => {
                write!(f, "Listings({} if {})", slot.name(), join_kinds(allowed))
            }
            Self::Blanket { kind } => write!(f, "Pattern({}, *)", kind),
            Self::BlanketOf { slot, allowed } => {
                write!(f, "Pattern({} if {}, *)", slot.name(), join_kinds(allowed))
            }
        }
    }
}
