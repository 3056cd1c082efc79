//! Command line interface for inspecting the invalidation graph and
//! maintaining a live cache
//!
//! - `graph`: print the invalidation rules
//! - `check`: verify every cached read can be invalidated
//! - `plan`: resolve the evictions one mutation would perform
//! - `evict`: delete a pattern from the configured backend

pub mod check;
pub mod evict;
pub mod graph;
pub mod plan;

use clap::{Parser, Subcommand};

/// entity-cache - cache coordination for domain repositories
#[derive(Parser)]
#[command(name = "entity-cache")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Print the Prometheus counters after the command finishes
    #[arg(long, global = true)]
    pub metrics: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print every invalidation rule with its strategy and targets
    Graph(graph::GraphArgs),

    /// Verify that every cached read has an invalidator
    Check,

    /// Resolve the eviction sequence of one mutation
    Plan(plan::PlanArgs),

    /// Delete every key matching a pattern on the configured backend
    Evict(evict::EvictArgs),
}
