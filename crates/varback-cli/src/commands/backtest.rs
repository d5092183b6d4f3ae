//! Backtest command implementation.
//!
//! Rolling one-day VaR forecasts checked against realized losses.

use anyhow::Result;
use clap::Args;
use tracing::info;
use varback_risk::prelude::{backtest_var, rolling_var, BacktestResult, ReturnSeries, VaRMethod};

use crate::cli::OutputFormat;
use crate::commands::{Context, DataArgs};
use crate::config::RunConfig;
use crate::output::{print_header, print_info, print_json, print_output, print_warning};
use crate::report::backtest_rows;

/// Arguments for the backtest command.
#[derive(Args, Debug)]
pub struct BacktestArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Models to backtest (comma separated). Defaults to all.
    #[arg(short, long = "model", value_delimiter = ',')]
    pub models: Vec<VaRMethod>,

    /// Significance level for the Kupiec verdict
    #[arg(short, long, default_value_t = 0.05)]
    pub significance: f64,

    /// List the dates of each exception
    #[arg(short, long)]
    pub exceptions: bool,
}

/// Rolling forecasts and backtest of each requested model.
pub fn run_backtests(
    returns: &ReturnSeries,
    config: &RunConfig,
    methods: &[VaRMethod],
) -> Result<Vec<BacktestResult>> {
    config
        .models(methods)
        .iter()
        .map(|model| -> Result<BacktestResult> {
            let forecasts = rolling_var(returns, model, config.window, config.alpha)?;
            info!("{}: {} rolling forecasts", model, forecasts.len());
            Ok(backtest_var(returns, &forecasts, config.alpha)?)
        })
        .collect()
}

/// Execute the backtest command.
pub fn execute(args: BacktestArgs, ctx: &Context) -> Result<()> {
    if !(args.significance > 0.0 && args.significance < 1.0) {
        anyhow::bail!(
            "Invalid significance: {}. Must be between 0 and 1.",
            args.significance
        );
    }
    let config = args.data.resolve(&ctx.config, None)?;
    let returns = args.data.load()?;
    let results = run_backtests(&returns, &config, &args.models)?;

    match ctx.format {
        OutputFormat::Table => {
            print_header(&format!(
                "Backtest (window = {}, alpha = {})",
                config.window, config.alpha
            ));
            print_output(&backtest_rows(&results), ctx.format)?;

            if !ctx.quiet {
                for result in &results {
                    let verdict = format!(
                        "{}: {} exceptions, {:.1} expected",
                        result.method,
                        result.exceptions,
                        result.expected_exceptions()
                    );
                    if result.kupiec_p_value < args.significance {
                        print_warning(&format!(
                            "{verdict}; coverage rejected at {}%",
                            args.significance * 100.0
                        ));
                    } else {
                        print_info(&verdict);
                    }
                }
            }

            if args.exceptions {
                for result in &results {
                    print_header(&format!("{} exceptions", result.method));
                    for date in result.exception_dates() {
                        println!("{date}");
                    }
                }
            }
        }
        OutputFormat::Json => print_json(&results)?,
        OutputFormat::Csv | OutputFormat::Minimal => {
            print_output(&backtest_rows(&results), ctx.format)?;
        }
    }

    Ok(())
}
