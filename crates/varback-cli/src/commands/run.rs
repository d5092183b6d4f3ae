//! Run command implementation.
//!
//! Loads prices, computes point estimates, rolling backtests, stress
//! scenarios, the worst window and the loss histogram, and writes every
//! report and chart to a directory.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use varback_math::statistics::histogram;
use varback_risk::prelude::{Observation, VaRMethod};

use crate::cli::OutputFormat;
use crate::commands::backtest::run_backtests;
use crate::commands::estimate::point_estimates;
use crate::commands::stress::run_stress;
use crate::commands::{Context, DataArgs};
use crate::output::{print_header, print_json, print_output, print_success};
use crate::report::{point_rows, RunReport, LOSS_HIST_BINS};

/// Arguments for the run command.
#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Output directory for reports
    #[arg(short, long, default_value = "docs")]
    pub out: PathBuf,

    /// Length of the worst trailing window, in observations
    #[arg(long)]
    pub worst_window: Option<usize>,
}

/// Execute the run command.
pub fn execute(args: RunArgs, ctx: &Context) -> Result<()> {
    let config = args.data.resolve(&ctx.config, args.worst_window)?;
    let returns = args.data.load()?;

    let all = VaRMethod::ALL;
    let losses: Vec<f64> = returns.cleaned().iter().map(Observation::loss).collect();
    let stress = run_stress(&returns, &config)?;
    let report = RunReport {
        alpha: config.alpha,
        window: config.window,
        point_estimates: point_estimates(&returns, &config, &all)?,
        backtests: run_backtests(&returns, &config, &all)?,
        stress: stress.scenarios,
        worst_window: stress.worst_window,
        loss_histogram: histogram(&losses, LOSS_HIST_BINS)?,
    };
    let written = report.write_all(&args.out)?;

    match ctx.format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Table => {
            print_header(&format!(
                "Point estimates (full sample, alpha = {})",
                config.alpha
            ));
            print_output(&point_rows(&report.point_estimates), ctx.format)?;
            if !ctx.quiet {
                for path in &written {
                    print_success(&format!("wrote {}", path.display()));
                }
            }
        }
        OutputFormat::Csv | OutputFormat::Minimal => {
            for path in &written {
                println!("{}", path.display());
            }
        }
    }

    Ok(())
}
