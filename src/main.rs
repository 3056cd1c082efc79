use clap::Parser;
use entity_cache::cli::{self, Cli, Command};
use entity_cache::config::AppConfig;
use entity_cache::infrastructure::observability::{init_metrics, init_tracing, shutdown_tracing};
use tracing::warn;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::load()?;

    init_tracing(&config.logging, &config.observability.tracing);
    let metrics = init_metrics(&config.observability.metrics);

    let result = match cli.command {
        Command::Graph(args) => cli::graph::run(args),
        Command::Check => cli::check::run(),
        Command::Plan(args) => cli::plan::run(args),
        Command::Evict(args) => cli::evict::run(args, &config).await,
    };

    if cli.metrics {
        match &metrics {
            Some(metrics) => print!("{}", metrics.render()),
            None => warn!("--metrics given but observability.metrics.enabled is false"),
        }
    }

    shutdown_tracing();
    result
}
