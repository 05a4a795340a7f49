use anyhow::Result;
use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

mod cli;
mod config;
mod error;
mod probe;
mod runner;
mod stats;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = cli::Cli::parse();
    let Some(selection) = args.selection() else {
        warn!("no test selected: use --all or pick at least one individual test");
        return Ok(());
    };

    let config = match config::BenchConfig::from_cli(&args) {
        Ok(c) => c,
        Err(e) => {
            warn!("{e}");
            return Ok(());
        }
    };

    runner::Runner::new(config).run(selection)
}
