//! `check` command

use std::io::Write;

use crate::domain::invalidation::{standard, InvalidationGraph, ReadShape};
use crate::domain::EntityKind;

/// Coverage problems found in an invalidation graph
#[derive(Debug, Default)]
pub struct CheckReport {
    /// Shapes no rule ever evicts
    pub uncovered: Vec<ReadShape>,
    /// Shapes their own kind's `Delete` rule leaves behind
    pub outliving_delete: Vec<ReadShape>,
    /// Kinds whose per-id values nothing removes or overwrites
    pub stale_entities: Vec<EntityKind>,
}

impl CheckReport {
    pub fn problems(&self) -> usize {
        self.uncovered.len() + self.outliving_delete.len() + self.stale_entities.len()
    }

    pub fn is_clean(&self) -> bool {
        self.problems() == 0
    }
}

pub fn check(graph: &InvalidationGraph) -> CheckReport {
    let uncovered = graph
        .shapes()
        .iter()
        .filter(|shape| graph.invalidators(shape.kind, shape.read).is_empty())
        .copied()
        .collect();

    let outliving_delete = graph.shapes_outliving_delete().into_iter().copied().collect();

    let stale_entities = graph
        .kinds()
        .into_iter()
        .filter(|kind| graph.entity_invalidators(*kind).is_empty())
        .collect();

    CheckReport {
        uncovered,
        outliving_delete,
        stale_entities,
    }
}

pub fn write_report(report: &CheckReport, out: &mut impl Write) -> std::io::Result<()> {
    for shape in &report.uncovered {
        writeln!(out, "no rule invalidates {}", shape)?;
    }

    for shape in &report.outliving_delete {
        writeln!(out, "{} survives {} Delete", shape, shape.kind)?;
    }

    for kind in &report.stale_entities {
        writeln!(out, "per-id {} values are never evicted", kind)?;
    }

    if report.is_clean() {
        writeln!(out, "ok")?;
    }

    Ok(())
}

pub fn run() -> anyhow::Result<()> {
    let report = check(&standard());
    write_report(&report, &mut std::io::stdout().lock())?;

    if !report.is_clean() {
        anyhow::bail!("invalidation graph has {} problem(s)", report.problems());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::invalidation::{Operation, ReadOp, ReadScope, Target};

    #[test]
    fn test_standard_graph_is_clean() {
        let report = check(&standard());

        assert!(report.is_clean(), "{:?}", report);

        let mut out = Vec::new();
        write_report(&report, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "ok\n");
    }

    #[test]
    fn test_reports_every_gap() {
        let graph = InvalidationGraph::builder()
            .shape(EntityKind::Todo, ReadOp::GetByOwner, ReadScope::Association)
            .shape(EntityKind::User, ReadOp::GetAll, ReadScope::Query)
            .rule(
                EntityKind::User,
                Operation::Create,
                [Target::listing(EntityKind::User, ReadOp::GetAll)],
            )
            .build()
            .unwrap();

        let report = check(&graph);

        assert_eq!(report.uncovered.len(), 1);
        assert_eq!(report.uncovered[0].kind, EntityKind::Todo);
        assert_eq!(report.outliving_delete.len(), 2);
        assert_eq!(report.stale_entities, vec![EntityKind::User]);
        assert_eq!(report.problems(), 4);

        let mut out = Vec::new();
        write_report(&report, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("no rule invalidates Todo:GetByOwner"));
        assert!(text.contains("User:GetAll survives User Delete"));
        assert!(!text.contains("ok"));
    }
}
