//! Varback CLI - VaR/ES estimation, backtesting and stress testing.
//!
//! # Usage
//!
//! ```bash
//! # Full pipeline, reports written to ./docs
//! varback run --data data/sample_prices.csv --out docs
//!
//! # Point estimates at 97.5%
//! varback estimate --data prices.csv --alpha 0.975
//!
//! # Rolling backtest of the EWMA model, as JSON
//! varback backtest --data prices.csv --model ewma --window 250 --format json
//!
//! # Stress scenarios from a config file
//! varback --config varback.toml stress --data prices.csv
//! ```

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod charts;
mod cli;
mod commands;
mod config;
mod data;
mod error;
mod output;
mod report;

use cli::{Cli, Commands};
use commands::Context;
use config::RunConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG takes precedence over --verbose
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let ctx = Context {
        format: cli.format,
        quiet: cli.quiet,
        config: RunConfig::load(cli.config.as_deref())?,
    };

    // Execute command
    match cli.command {
        Commands::Run(args) => commands::run::execute(args, &ctx)?,
        Commands::Estimate(args) => commands::estimate::execute(args, &ctx)?,
        Commands::Backtest(args) => commands::backtest::execute(args, &ctx)?,
        Commands::Stress(args) => commands::stress::execute(args, &ctx)?,
    }

    Ok(())
}
