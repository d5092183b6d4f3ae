//! Estimate command implementation.
//!
//! Full-sample VaR/ES point estimates for each model.

use anyhow::Result;
use clap::Args;
use varback_risk::prelude::{ReturnSeries, VaRMethod, VaRResult};

use crate::cli::OutputFormat;
use crate::commands::{Context, DataArgs};
use crate::config::RunConfig;
use crate::output::{print_header, print_info, print_json, print_output};
use crate::report::point_rows;

/// Arguments for the estimate command.
#[derive(Args, Debug)]
pub struct EstimateArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Models to evaluate (comma separated). Defaults to all.
    #[arg(short, long = "model", value_delimiter = ',')]
    pub models: Vec<VaRMethod>,
}

/// Point estimates of the requested models on the cleaned series.
pub fn point_estimates(
    returns: &ReturnSeries,
    config: &RunConfig,
    methods: &[VaRMethod],
) -> Result<Vec<VaRResult>> {
    let values = returns.cleaned().values();
    let results = config
        .models(methods)
        .iter()
        .map(|model| model.estimate(&values, config.alpha))
        .collect::<varback_risk::RiskResult<Vec<_>>>()?;
    Ok(results)
}

/// Execute the estimate command.
pub fn execute(args: EstimateArgs, ctx: &Context) -> Result<()> {
    let config = args.data.resolve(&ctx.config, None)?;
    let returns = args.data.load()?;
    let results = point_estimates(&returns, &config, &args.models)?;

    match ctx.format {
        OutputFormat::Table => {
            print_header(&format!(
                "Point estimates (full sample, alpha = {})",
                config.alpha
            ));
            print_output(&point_rows(&results), ctx.format)?;
            if !ctx.quiet {
                print_info(&format!("{} returns", returns.cleaned().len()));
            }
        }
        OutputFormat::Json => print_json(&results)?,
        OutputFormat::Csv | OutputFormat::Minimal => {
            print_output(&point_rows(&results), ctx.format)?;
        }
    }

    Ok(())
}
