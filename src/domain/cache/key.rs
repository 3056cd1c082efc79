//! Cache key composition
//!
//! Every key has the shape `Kind:<part>:<part>:...`. Keys and patterns are
//! distinct types so a per-id key can never be passed where a pattern is
//! expected and vice versa.

use std::borrow::Cow;
use std::fmt::Write as _;

use crate::domain::entity::{EntityId, EntityKind};
use crate::domain::DomainError;

/// Segment separator
pub const SEPARATOR: char = ':';

/// Wildcard token
pub const WILDCARD: &str = "*";

/// One discriminator of a cache key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyPart {
    /// Free-form text, escaped so it always stays a single segment
    Str(String),
    /// Integer, formatted in base 10
    Int(i128),
    /// The wildcard token, emitted verbatim
    Wildcard,
    /// Nested parts, flattened in order
    List(Vec<KeyPart>),
}

impl From<&str> for KeyPart {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for KeyPart {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&String> for KeyPart {
    fn from(value: &String) -> Self {
        Self::Str(value.clone())
    }
}

impl From<i64> for KeyPart {
    fn from(value: i64) -> Self {
        Self::Int(value as i128)
    }
}

impl From<i32> for KeyPart {
    fn from(value: i32) -> Self {
        Self::Int(value as i128)
    }
}

impl From<u32> for KeyPart {
    fn from(value: u32) -> Self {
        Self::Int(value as i128)
    }
}

impl From<usize> for KeyPart {
    fn from(value: usize) -> Self {
        Self::Int(value as i128)
    }
}

/// An id contributes two segments, its kind and its value, so ids of
/// different kinds sharing a value never share a key
impl From<&EntityId> for KeyPart {
    fn from(id: &EntityId) -> Self {
        Self::List(vec![
            Self::Str(id.kind().as_str().to_string()),
            Self::Str(id.value().to_string()),
        ])
    }
}

impl From<EntityId> for KeyPart {
    fn from(id: EntityId) -> Self {
        Self::from(&id)
    }
}

impl<T: Into<KeyPart>> From<Vec<T>> for KeyPart {
    fn from(parts: Vec<T>) -> Self {
        Self::List(parts.into_iter().map(Into::into).collect())
    }
}

/// Deterministic key construction
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyCodec;

impl KeyCodec {
    /// Composes `kind:<p1>:...:<pn>`.
    ///
    /// # Panics
    ///
    /// Panics when `parts` flattens to nothing. Keys are built from fixed
    /// templates, so this only happens on a programming error.
    pub fn compose<I>(kind: EntityKind, parts: I) -> String
    where
        I: IntoIterator<Item = KeyPart>,
    {
        let segments = Self::segments(parts);

        assert!(
            !segments.is_empty(),
            "cache key for {} needs at least one part",
            kind
        );

        Self::join(kind, &segments)
    }

    fn segments<I>(parts: I) -> Vec<Segment>
    where
        I: IntoIterator<Item = KeyPart>,
    {
        let mut segments = Vec::new();

        for part in parts {
            flatten_into(part, &mut segments);
        }

        segments
    }

    fn join(kind: EntityKind, segments: &[Segment]) -> String {
        let mut key = String::from(kind.as_str());

        for segment in segments {
            key.push(SEPARATOR);

            match segment {
                Segment::Text(text) => key.push_str(&escape_segment(text)),
                Segment::Int(value) => {
                    let _ = write!(key, "{}", value);
                }
                Segment::Wildcard => key.push_str(WILDCARD),
            }
        }

        key
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Int(i128),
    Wildcard,
}

fn flatten_into(part: KeyPart, out: &mut Vec<Segment>) {
    match part {
        KeyPart::Str(text) => out.push(Segment::Text(text)),
        KeyPart::Int(value) => out.push(Segment::Int(value)),
        KeyPart::Wildcard => out.push(Segment::Wildcard),
        KeyPart::List(parts) => {
            for part in parts {
                flatten_into(part, out);
            }
        }
    }
}

fn needs_escape(c: char) -> bool {
    matches!(c, '%' | ':' | '*' | '?' | '[' | ']' | '\\')
}

/// Percent-escapes the separator, the escape character itself and the store's
/// glob metacharacters.
fn escape_segment(raw: &str) -> Cow<'_, str> {
    if !raw.chars().any(needs_escape) {
        return Cow::Borrowed(raw);
    }

    let mut escaped = String::with_capacity(raw.len() + 8);

    for c in raw.chars() {
        if needs_escape(c) {
            let _ = write!(escaped, "%{:02X}", c as u32);
        } else {
            escaped.push(c);
        }
    }

    Cow::Owned(escaped)
}

/// Key of exactly one cached value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    kind: EntityKind,
    value: String,
}

impl CacheKey {
    /// # Panics
    ///
    /// Panics when `parts` is empty or contains the wildcard.
    pub fn compose<I>(kind: EntityKind, parts: I) -> Self
    where
        I: IntoIterator<Item = KeyPart>,
    {
        let segments = KeyCodec::segments(parts);

        assert!(
            !segments.is_empty(),
            "cache key for {} needs at least one part",
            kind
        );
        assert!(
            !segments.contains(&Segment::Wildcard),
            "cache key for {} cannot contain a wildcard",
            kind
        );

        Self {
            kind,
            value: KeyCodec::join(kind, &segments),
        }
    }

    /// Canonical per-id key
    pub fn for_entity(id: &EntityId) -> Self {
        Self::compose(id.kind(), [KeyPart::from(id.value())])
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value)
    }
}

/// Key ending in the wildcard token, matching a family of keys
///
/// A trailing wildcard matches zero or more trailing segments; a wildcard in
/// any other position matches exactly one segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CachePattern {
    kind: EntityKind,
    value: String,
}

impl CachePattern {
    /// Composes the parts and appends a trailing wildcard.
    pub fn compose<I>(kind: EntityKind, parts: I) -> Self
    where
        I: IntoIterator<Item = KeyPart>,
    {
        let mut segments = KeyCodec::segments(parts);

        if segments.last() != Some(&Segment::Wildcard) {
            segments.push(Segment::Wildcard);
        }

        Self {
            kind,
            value: KeyCodec::join(kind, &segments),
        }
    }

    /// Blanket pattern over every key of a kind
    pub fn all(kind: EntityKind) -> Self {
        Self::compose(kind, [])
    }

    /// Parses the wire form, e.g. `Issue:GetRelations:abc:*`
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let mut segments = raw.split(SEPARATOR);

        let kind = segments
            .next()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| DomainError::validation("Cache pattern cannot be empty"))?
            .parse::<EntityKind>()?;

        let rest: Vec<&str> = segments.collect();

        if rest.last() != Some(&WILDCARD) {
            return Err(DomainError::validation(format!(
                "Cache pattern '{}' must end with '{}'",
                raw, WILDCARD
            )));
        }

        if rest.iter().any(|s| s.is_empty()) {
            return Err(DomainError::validation(format!(
                "Cache pattern '{}' has an empty segment",
                raw
            )));
        }

        let mut value = String::from(kind.as_str());

        for segment in rest {
            value.push(SEPARATOR);
            value.push_str(segment);
        }

        Ok(Self { kind, value })
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Checks a stored key against this pattern with segment semantics
    pub fn matches(&self, key: &str) -> bool {
        let pattern: Vec<&str> = self.value.split(SEPARATOR).collect();
        let key: Vec<&str> = key.split(SEPARATOR).collect();
        let last = pattern.len() - 1;

        for (index, segment) in pattern.iter().enumerate() {
            if *segment == WILDCARD && index == last {
                return key.len() >= index;
            }

            match key.get(index) {
                Some(candidate) if *segment == WILDCARD || candidate == segment => {}
                _ => return false,
            }
        }

        key.len() == pattern.len()
    }

    /// Glob understood by the store's key enumeration.
    ///
    /// The glob is a superset of the pattern (the trailing `:*` widens to
    /// `*`), so enumerated keys must still be checked with [`Self::matches`].
    pub fn store_glob(&self) -> String {
        let suffix = format!("{}{}", SEPARATOR, WILDCARD);

        match self.value.strip_suffix(&suffix) {
            Some(prefix) => format!("{}{}", prefix, WILDCARD),
            None => self.value.clone(),
        }
    }
}

impl std::fmt::Display for CachePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value)
    }
}

/// Builds a [`CacheKey`] from heterogeneous parts
#[macro_export]
macro_rules! cache_key {
    ($kind:expr, $($part:expr),+ $(,)?) => {
        $crate::domain::cache::CacheKey::compose(
            $kind,
            [$($crate::domain::cache::KeyPart::from($part)),+],
        )
    };
}

/// Builds a [`CachePattern`]; the trailing wildcard is appended
#[macro_export]
macro_rules! cache_pattern {
    ($kind:expr) => {
        $crate::domain::cache::CachePattern::all($kind)
    };
    ($kind:expr, $($part:expr),+ $(,)?) => {
        $crate::domain::cache::CachePattern::compose(
            $kind,
            [$($crate::domain::cache::KeyPart::from($part)),+],
        )
    };
}
