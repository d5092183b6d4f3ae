//! Stress command implementation.
//!
//! VaR/ES of every model under the configured scenarios, plus the worst
//! historical trailing window.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use varback_risk::prelude::{
    stress_test, worst_window_sum, ReturnSeries, StressSummary, VaRModel, WorstWindow,
};

use crate::cli::OutputFormat;
use crate::commands::{Context, DataArgs};
use crate::config::RunConfig;
use crate::output::{print_header, print_json, print_output};
use crate::report::stress_rows;

/// Arguments for the stress command.
#[derive(Args, Debug)]
pub struct StressArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Length of the worst trailing window, in observations
    #[arg(long)]
    pub worst_window: Option<usize>,
}

/// Scenario results and the worst trailing window.
#[derive(Debug, Clone, Serialize)]
pub struct StressOutcome {
    pub scenarios: Vec<StressSummary>,
    pub worst_window: WorstWindow,
}

/// Evaluates all models under every configured scenario.
pub fn run_stress(returns: &ReturnSeries, config: &RunConfig) -> Result<StressOutcome> {
    let models = VaRModel::all(config.ewma);
    let scenarios = stress_test(returns, &config.scenarios, &models, config.alpha)?;
    let worst_window = worst_window_sum(returns, config.worst_window)?;
    Ok(StressOutcome {
        scenarios,
        worst_window,
    })
}

/// Execute the stress command.
pub fn execute(args: StressArgs, ctx: &Context) -> Result<()> {
    let config = args.data.resolve(&ctx.config, args.worst_window)?;
    let returns = args.data.load()?;
    let outcome = run_stress(&returns, &config)?;

    match ctx.format {
        OutputFormat::Table => {
            print_header(&format!("Stress scenarios (alpha = {})", config.alpha));
            print_output(&stress_rows(&outcome.scenarios), ctx.format)?;
            print_header(&format!(
                "Worst historical window ({} trading days)",
                outcome.worst_window.window
            ));
            println!(
                "Ends at {}, cumulative return (simple sum) {:.4}",
                outcome.worst_window.end_date, outcome.worst_window.cumulative_return
            );
        }
        OutputFormat::Json => print_json(&outcome)?,
        OutputFormat::Csv => print_output(&stress_rows(&outcome.scenarios), ctx.format)?,
        OutputFormat::Minimal => println!("{:.4}", outcome.worst_window.cumulative_return),
    }

    Ok(())
}
