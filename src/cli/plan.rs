//! `plan` command

use std::io::Write;

use clap::Args;

use crate::domain::invalidation::{standard, EvictionArgs, InvalidationGraph, Operation};
use crate::domain::{EntityId, EntityKind};

#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Kind of the mutated entity
    #[arg(long)]
    pub kind: EntityKind,

    /// Mutating operation, e.g. `create` or `add_relation`
    #[arg(long)]
    pub op: Operation,

    /// Id of the mutated entity, as `Kind:value`
    #[arg(long)]
    pub subject: Option<EntityId>,

    /// Owning entity id, as `Kind:value`
    #[arg(long)]
    pub parent: Option<EntityId>,

    /// Other entity id named by the call, as `Kind:value`
    #[arg(long)]
    pub related: Option<EntityId>,
}

pub fn run(args: PlanArgs) -> anyhow::Result<()> {
    write_plan(&standard(), &args, &mut std::io::stdout().lock())
}

pub fn write_plan(
    graph: &InvalidationGraph,
    args: &PlanArgs,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let mut eviction_args = EvictionArgs::new()
        .maybe_parent(args.parent.as_ref())
        .maybe_related(args.related.as_ref());

    if let Some(subject) = &args.subject {
        eviction_args = eviction_args.subject(subject);
    }

    let plan = graph.plan(args.kind, args.op, &eviction_args)?;

    writeln!(out, "{} {} [{}]", plan.kind, plan.operation, plan.strategy)?;

    if plan.is_empty() {
        writeln!(out, "  nothing to evict")?;
    }

    for (step, eviction) in plan.iter().enumerate() {
        writeln!(out, "  {}. {}", step + 1, eviction)?;
    }

    Ok(())
}
