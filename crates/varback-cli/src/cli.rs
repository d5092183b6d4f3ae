//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::commands::{BacktestArgs, EstimateArgs, RunArgs, StressArgs};

/// Varback - VaR/ES estimation, backtesting and stress testing
#[derive(Parser)]
#[command(name = "varback")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// TOML configuration file
    #[arg(short, long, global = true, env = "VARBACK_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Run the full pipeline and write all reports to a directory
    Run(RunArgs),

    /// Full-sample VaR/ES point estimates
    Estimate(EstimateArgs),

    /// Rolling out-of-sample backtest with the Kupiec test
    Backtest(BacktestArgs),

    /// VaR/ES under stress scenarios and the worst historical window
    Stress(StressArgs),
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
    /// Minimal output (first row only)
    Minimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "varback", "backtest", "--data", "p.csv", "--format", "json", "--alpha", "0.95",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::Backtest(args) => {
                assert_eq!(args.data.alpha, Some(0.95));
                assert_eq!(args.data.data, PathBuf::from("p.csv"));
            }
            _ => panic!("expected backtest"),
        }
    }

    #[test]
    fn test_model_list() {
        let cli = Cli::try_parse_from(["varback", "estimate", "--model", "ewma,historical"]).unwrap();
        match cli.command {
            Commands::Estimate(args) => assert_eq!(args.models.len(), 2),
            _ => panic!("expected estimate"),
        }
        assert!(Cli::try_parse_from(["varback", "estimate", "--model", "garch"]).is_err());
    }
}
