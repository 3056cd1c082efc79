//! `graph` command

use std::io::Write;

use clap::Args;
use serde_json::json;

use crate::domain::invalidation::{standard, InvalidationGraph, InvalidationRule};
use crate::domain::EntityKind;

#[derive(Args, Debug)]
pub struct GraphArgs {
    /// Only print rules of this kind
    #[arg(long)]
    pub kind: Option<EntityKind>,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: GraphArgs) -> anyhow::Result<()> {
    let graph = standard();
    let mut out = std::io::stdout().lock();

    if args.json {
        write_json(&graph, args.kind, &mut out)
    } else {
        write_text(&graph, args.kind, &mut out)
    }
}

fn selected(
    graph: &InvalidationGraph,
    kind: Option<EntityKind>,
) -> impl Iterator<Item = &InvalidationRule> {
    graph
        .rules()
        .iter()
        .filter(move |rule| kind.is_none_or(|k| rule.kind == k))
}

pub fn write_text(
    graph: &InvalidationGraph,
    kind: Option<EntityKind>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    for rule in selected(graph, kind) {
        writeln!(out, "{} {} [{}]", rule.kind, rule.operation, rule.strategy)?;

        for target in &rule.targets {
            writeln!(out, "  {}", target)?;
        }
    }

    Ok(())
}

pub fn write_json(
    graph: &InvalidationGraph,
    kind: Option<EntityKind>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let shapes: Vec<_> = graph
        .shapes()
        .iter()
        .filter(|shape| kind.is_none_or(|k| shape.kind == k))
        .collect();

    let rules: Vec<_> = selected(graph, kind)
        .map(|rule| {
            json!({
                "kind": rule.kind,
                "operation": rule.operation,
                "strategy": rule.strategy,
                "targets": rule.targets.iter().map(ToString::to_string).collect::<Vec<_>>(),
            })
        })
        .collect();

    serde_json::to_writer_pretty(&mut *out, &json!({ "shapes": shapes, "rules": rules }))?;
    writeln!(out)?;

    Ok(())
}
