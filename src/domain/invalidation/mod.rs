//! Invalidation domain - read shapes, mutation rules and eviction planning

mod graph;
mod operation;
mod rules;
mod shape;
mod target;

pub use graph::{
    EvictionPlan, GraphBuilder, GraphError, InvalidationGraph, InvalidationRule, WriteStrategy,
};
pub use operation::{Operation, ReadOp};
pub use rules::{relation_endpoint, standard, standard_graph};
pub use shape::{ReadScope, ReadShape};
pub use target::{Eviction, EvictionArgs, Slot, Target};
