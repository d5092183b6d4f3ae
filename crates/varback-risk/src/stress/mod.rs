//! Stress testing for return series.
//!
//! This module provides:
//! - Scenario definitions (mean shift plus volatility multiplier)
//! - The scenario transform of a return series
//! - Re-estimation of every VaR model under each scenario
//! - The worst historical trailing window
//!
//! Scenarios never mutate their input; each produces a new series that the
//! ordinary estimators consume unchanged.

mod scenarios;
mod worst_window;

pub use scenarios::*;
pub use worst_window::*;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{RiskError, RiskResult};
use crate::parallel::maybe_parallel_map;
use crate::series::ReturnSeries;
use crate::var::{VaRMethod, VaRModel, VaRResult};
use varback_math::statistics::mean;

/// VaR/ES of every requested model under one scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressSummary {
    /// Scenario name.
    pub scenario: String,
    /// One result per model, in the order requested.
    pub results: Vec<VaRResult>,
}

impl StressSummary {
    /// Result of `method`, if it was evaluated.
    #[must_use]
    pub fn result(&self, method: VaRMethod) -> Option<&VaRResult> {
        self.results.iter().find(|r| r.method == method)
    }
}

/// Applies a scenario to a return series.
///
/// With `µ` the mean of the cleaned series, each return becomes
/// `µ + vol_mult·(r − µ) + shock_return`. Missing observations are dropped;
/// all remaining dates are kept.
///
/// # Errors
///
/// Returns [`RiskError::EmptyInput`] if no finite return remains, or an
/// invalid-parameter error for a malformed scenario.
///
/// # Example
///
/// ```rust
/// use chrono::NaiveDate;
/// use varback_risk::series::ReturnSeries;
/// use varback_risk::stress::{apply_scenario, Scenario};
///
/// let d = |day| NaiveDate::from_ymd_opt(2024, 2, day).unwrap();
/// let returns = ReturnSeries::from_parts(&[d(1), d(2)], &[0.01, -0.03]).unwrap();
///
/// let stressed = apply_scenario(&returns, &Scenario::new("Shock", -0.01, 2.0)).unwrap();
/// // mean -0.01: -0.01 + 2·0.02 - 0.01 and -0.01 + 2·(-0.02) - 0.01
/// assert!((stressed.values()[0] - 0.02).abs() < 1e-12);
/// assert!((stressed.values()[1] + 0.06).abs() < 1e-12);
/// ```
pub fn apply_scenario(returns: &ReturnSeries, scenario: &Scenario) -> RiskResult<ReturnSeries> {
    scenario.validate()?;
    let cleaned = returns.cleaned();
    if cleaned.is_empty() {
        return Err(RiskError::EmptyInput);
    }
    let mu = mean(&cleaned.values())?;

    Ok(cleaned.map_values(|r| mu + scenario.vol_mult * (r - mu) + scenario.shock_return))
}

/// Evaluates every model under every scenario.
///
/// Scenarios are independent and may be evaluated in parallel; the output
/// keeps the scenario order.
pub fn stress_test(
    returns: &ReturnSeries,
    scenarios: &[Scenario],
    models: &[VaRModel],
    alpha: f64,
) -> RiskResult<Vec<StressSummary>> {
    maybe_parallel_map(scenarios, |scenario| {
        let stressed = apply_scenario(returns, scenario)?;
        let values = stressed.values();
        let results = models
            .iter()
            .map(|model| model.estimate(&values, alpha))
            .collect::<RiskResult<Vec<_>>>()?;

        debug!(
            "stress scenario '{}' (shock {}, vol x{}): {} model(s) evaluated",
            scenario.name,
            scenario.shock_return,
            scenario.vol_mult,
            results.len()
        );

        Ok(StressSummary {
            scenario: scenario.name.clone(),
            results,
        })
    })
    .into_iter()
    .collect()
}
