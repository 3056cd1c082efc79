//! Invalidation graph - which cached reads each mutation makes stale

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;
use thiserror::Error;

use super::operation::{Operation, ReadOp};
use super::shape::{ReadScope, ReadShape};
use super::target::{Eviction, EvictionArgs, Target};
use crate::domain::entity::EntityKind;
use crate::domain::DomainError;

/// Ordering of evictions relative to the underlying call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WriteStrategy {
    /// Evict every target, then call the underlying repository
    EvictThenDelegate,
    /// Call the underlying repository, write the fresh entity to its key,
    /// then evict every target
    DelegateThenRefresh,
}

impl std::fmt::Display for WriteStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EvictThenDelegate => write!(f, "evict-then-delegate"),
            Self::DelegateThenRefresh => write!(f, "delegate-then-refresh"),
        }
    }
}

/// Evictions owed by one mutating operation of one kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidationRule {
    pub kind: EntityKind,
    pub operation: Operation,
    pub strategy: WriteStrategy,
    pub targets: Vec<Target>,
}

/// Errors detected while assembling a graph
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("Read shape {kind}:{read} is declared twice")]
    DuplicateShape { kind: EntityKind, read: ReadOp },

    #[error("Rule for {kind} {operation} is declared twice")]
    DuplicateRule {
        kind: EntityKind,
        operation: Operation,
    },

    #[error("Rule for {kind} {operation} names undeclared read {target_kind}:{read}")]
    UndeclaredShape {
        kind: EntityKind,
        operation: Operation,
        target_kind: EntityKind,
        read: ReadOp,
    },

    #[error("Rule for {kind} {operation} scopes query read {target_kind}:{read} by id")]
    ScopedQuery {
        kind: EntityKind,
        operation: Operation,
        target_kind: EntityKind,
        read: ReadOp,
    },

    #[error("Rule for {kind} {operation} cannot use {strategy}")]
    StrategyMismatch {
        kind: EntityKind,
        operation: Operation,
        strategy: WriteStrategy,
    },

    #[error("Rule for {kind} {operation} evicts nothing")]
    EmptyRule {
        kind: EntityKind,
        operation: Operation,
    },
}

impl From<GraphError> for DomainError {
    fn from(e: GraphError) -> Self {
        DomainError::configuration(e.to_string())
    }
}

/// Resolved evictions for one call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvictionPlan {
    pub kind: EntityKind,
    pub operation: Operation,
    pub strategy: WriteStrategy,
    pub evictions: Vec<Eviction>,
}

impl EvictionPlan {
    pub fn len(&self) -> usize {
        self.evictions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.evictions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Eviction> {
        self.evictions.iter()
    }
}

/// Builder for [`InvalidationGraph`]
#[derive(Debug, Default)]
pub struct GraphBuilder {
    shapes: Vec<ReadShape>,
    rules: Vec<InvalidationRule>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a cached parametric read
    pub fn shape(mut self, kind: EntityKind, read: ReadOp, scope: ReadScope) -> Self {
        self.shapes.push(ReadShape::new(kind, read, scope));
        self
    }

    /// Declares an evict-then-delegate rule
    pub fn rule<I>(mut self, kind: EntityKind, operation: Operation, targets: I) -> Self
    where
        I: IntoIterator<Item = Target>,
    {
        self.rules.push(InvalidationRule {
            kind,
            operation,
            strategy: WriteStrategy::EvictThenDelegate,
            targets: targets.into_iter().collect(),
        });
        self
    }

    /// Declares the delegate-then-refresh rule for `Update`
    pub fn refresh<I>(mut self, kind: EntityKind, targets: I) -> Self
    where
        I: IntoIterator<Item = Target>,
    {
        self.rules.push(InvalidationRule {
            kind,
            operation: Operation::Update,
            strategy: WriteStrategy::DelegateThenRefresh,
            targets: targets.into_iter().collect(),
        });
        self
    }

    pub fn build(self) -> Result<InvalidationGraph, GraphError> {
        let mut declared = HashMap::new();
        for shape in &self.shapes {
            if declared.insert((shape.kind, shape.read), *shape).is_some() {
                return Err(GraphError::DuplicateShape {
                    kind: shape.kind,
                    read: shape.read,
                });
            }
        }

        let mut index = HashMap::new();
        for (position, rule) in self.rules.iter().enumerate() {
            let (kind, operation) = (rule.kind, rule.operation);

            if index.insert((kind, operation), position).is_some() {
                return Err(GraphError::DuplicateRule { kind, operation });
            }

            let refresh = operation == Operation::Update;
            let expected = if refresh {
                WriteStrategy::DelegateThenRefresh
            } else {
                WriteStrategy::EvictThenDelegate
            };
            if rule.strategy != expected {
                return Err(GraphError::StrategyMismatch {
                    kind,
                    operation,
                    strategy: rule.strategy,
                });
            }

            if !refresh && rule.targets.is_empty() {
                return Err(GraphError::EmptyRule { kind, operation });
            }

            for target in &rule.targets {
                let Some((target_kind, read)) = target.named_read() else {
                    continue;
                };

                let shape = declared.get(&(target_kind, read)).ok_or(
                    GraphError::UndeclaredShape {
                        kind,
                        operation,
                        target_kind,
                        read,
                    },
                )?;

                if matches!(target, Target::Scoped { .. }) && !shape.is_id_scoped() {
                    return Err(GraphError::ScopedQuery {
                        kind,
                        operation,
                        target_kind,
                        read,
                    });
                }
            }
        }

        Ok(InvalidationGraph {
            shapes: self.shapes,
            rules: self.rules,
            index,
        })
    }
}

/// Static table of read shapes and mutation rules
///
/// Immutable after construction; shared read-only by every wrapper.
#[derive(Debug)]
pub struct InvalidationGraph {
    shapes: Vec<ReadShape>,
    rules: Vec<InvalidationRule>,
    index: HashMap<(EntityKind, Operation), usize>,
}

impl InvalidationGraph {
    pub fn builder() -> GraphBuilder {
        GraphBuilder::new()
    }

    pub fn shapes(&self) -> &[ReadShape] {
        &self.shapes
    }

    pub fn shapes_of(&self, kind: EntityKind) -> impl Iterator<Item = &ReadShape> {
        self.shapes.iter().filter(move |s| s.kind == kind)
    }

    pub fn shape(&self, kind: EntityKind, read: ReadOp) -> Option<&ReadShape> {
        self.shapes.iter().find(|s| s.kind == kind && s.read == read)
    }

    pub fn rules(&self) -> &[InvalidationRule] {
        &self.rules
    }

    pub fn rules_of(&self, kind: EntityKind) -> impl Iterator<Item = &InvalidationRule> {
        self.rules.iter().filter(move |r| r.kind == kind)
    }

    pub fn rule(&self, kind: EntityKind, operation: Operation) -> Option<&InvalidationRule> {
        self.index.get(&(kind, operation)).map(|&i| &self.rules[i])
    }

    /// Resolves the rule for `(kind, operation)` against the call arguments,
    /// preserving target order.
    pub fn plan(
        &self,
        kind: EntityKind,
        operation: Operation,
        args: &EvictionArgs<'_>,
    ) -> Result<EvictionPlan, DomainError> {
        let rule = self.rule(kind, operation).ok_or_else(|| {
            DomainError::internal(format!("No invalidation rule for {} {}", kind, operation))
        })?;

        let mut evictions = Vec::with_capacity(rule.targets.len());
        for target in &rule.targets {
            target.resolve(args, &self.shapes, &mut evictions)?;
        }

        Ok(EvictionPlan {
            kind,
            operation,
            strategy: rule.strategy,
            evictions,
        })
    }

    /// Other kinds whose cached values the rule may remove
    pub fn cross_kinds(&self, kind: EntityKind, operation: Operation) -> Vec<EntityKind> {
        self.rule(kind, operation)
            .map(|rule| {
                rule.targets
                    .iter()
                    .flat_map(Target::touched_kinds)
                    .filter(|k| *k != kind)
                    .collect::<BTreeSet<_>>()
                    .into_iter()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Rules that can remove values of the given read shape
    pub fn invalidators(&self, kind: EntityKind, read: ReadOp) -> Vec<(EntityKind, Operation)> {
        let Some(shape) = self.shape(kind, read) else {
            return Vec::new();
        };

        self.rules
            .iter()
            .filter(|rule| rule.targets.iter().any(|t| t.covers_read(shape)))
            .map(|rule| (rule.kind, rule.operation))
            .collect()
    }

    /// Rules that can remove or overwrite per-id values of the given kind
    pub fn entity_invalidators(&self, kind: EntityKind) -> Vec<(EntityKind, Operation)> {
        self.rules
            .iter()
            .filter(|rule| {
                (rule.kind == kind && rule.strategy == WriteStrategy::DelegateThenRefresh)
                    || rule.targets.iter().any(|t| t.covers_entity(kind))
            })
            .map(|rule| (rule.kind, rule.operation))
            .collect()
    }

    /// Shapes the `Delete` rule of their own kind never removes
    pub fn shapes_outliving_delete(&self) -> Vec<&ReadShape> {
        self.shapes
            .iter()
            .filter(|shape| {
                !self
                    .rule(shape.kind, Operation::Delete)
                    .is_some_and(|rule| rule.targets.iter().any(|t| t.covers_read(shape)))
            })
            .collect()
    }

    /// Kinds with at least one declared rule
    pub fn kinds(&self) -> Vec<EntityKind> {
        self.rules
            .iter()
            .map(|r| r.kind)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
