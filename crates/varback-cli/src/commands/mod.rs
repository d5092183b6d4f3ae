//! CLI command implementations.

pub mod backtest;
pub mod estimate;
pub mod run;
pub mod stress;

// Re-export submodules for convenience
pub use backtest::BacktestArgs;
pub use estimate::EstimateArgs;
pub use run::RunArgs;
pub use stress::StressArgs;

use std::path::PathBuf;

use clap::Args;
use tracing::info;
use varback_risk::prelude::ReturnSeries;

use crate::cli::OutputFormat;
use crate::config::{Overrides, RunConfig};
use crate::data::load_returns;
use crate::error::CliResult;

/// Settings resolved before any command runs.
#[derive(Debug, Clone)]
pub struct Context {
    /// Output format for stdout.
    pub format: OutputFormat,
    /// Suppress informational messages.
    pub quiet: bool,
    /// Configuration loaded from file, before command-line overrides.
    pub config: RunConfig,
}

/// Input file and model settings shared by every command.
#[derive(Args, Debug, Clone)]
pub struct DataArgs {
    /// CSV file with `date` and `close` columns
    #[arg(short, long, env = "VARBACK_DATA", default_value = "data/sample_prices.csv")]
    pub data: PathBuf,

    /// VaR/ES confidence level, in [0.90, 1.0)
    #[arg(short, long)]
    pub alpha: Option<f64>,

    /// Rolling estimation window, in observations (at least 50)
    #[arg(short, long)]
    pub window: Option<usize>,

    /// EWMA decay factor
    #[arg(long)]
    pub lambda: Option<f64>,
}

impl DataArgs {
    /// Applies these flags to `config` and validates the result.
    pub fn resolve(&self, config: &RunConfig, worst_window: Option<usize>) -> CliResult<RunConfig> {
        let config = config.clone().with_overrides(Overrides {
            alpha: self.alpha,
            window: self.window,
            lambda: self.lambda,
            worst_window,
        });
        config.validate()?;
        Ok(config)
    }

    /// Loads the return series named by `--data`.
    pub fn load(&self) -> CliResult<ReturnSeries> {
        let returns = load_returns(&self.data)?;
        info!(
            "{} returns from {}",
            returns.len(),
            self.data.display()
        );
        Ok(returns)
    }
}
