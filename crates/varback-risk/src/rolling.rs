//! Rolling one-step-ahead VaR forecasts.
//!
//! The forecast dated `t` is estimated from the `window` observations
//! strictly before `t`, so a backtest against the return realized on `t`
//! is out of sample.

use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{RiskError, RiskResult};
use crate::parallel::maybe_parallel_map;
use crate::series::ReturnSeries;
use crate::var::{validate_alpha, VaRMethod, VaRModel};

/// A VaR forecast for one date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    /// Date the forecast applies to.
    pub date: NaiveDate,
    /// Forecast loss threshold.
    pub var: f64,
}

/// Ordered VaR forecasts produced by one model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSeries {
    /// Model that produced the forecasts.
    pub method: VaRMethod,
    /// Confidence level.
    pub alpha: f64,
    /// Lookback length.
    pub window: usize,
    /// Forecasts in date order.
    pub points: Vec<Forecast>,
}

impl ForecastSeries {
    /// Number of forecasts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if no forecast was produced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterates over forecasts in date order.
    pub fn iter(&self) -> std::slice::Iter<'_, Forecast> {
        self.points.iter()
    }

    /// Forecast for `date`, if any.
    #[must_use]
    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.points
            .binary_search_by_key(&date, |f| f.date)
            .ok()
            .map(|i| self.points[i].var)
    }
}

/// Rolling VaR forecasts over a return series.
///
/// Missing observations are dropped first. For every position `i` from
/// `window` to the end of the cleaned series, `model` is estimated on
/// positions `[i - window, i)` and the result is dated at position `i`. The
/// output has `len - window` forecasts, none when the series is not longer
/// than the window.
///
/// # Errors
///
/// Returns an error for `window == 0`, `alpha` outside (0, 1), an empty
/// series, or any estimator failure.
///
/// # Example
///
/// ```rust
/// use chrono::{Days, NaiveDate};
/// use varback_risk::rolling::rolling_var;
/// use varback_risk::series::ReturnSeries;
/// use varback_risk::var::VaRModel;
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let dates: Vec<NaiveDate> = (0..120).map(|i| start + Days::new(i)).collect();
/// let values: Vec<f64> = (0..120).map(|i| ((i * 7 % 13) as f64 - 6.0) / 500.0).collect();
/// let returns = ReturnSeries::from_parts(&dates, &values).unwrap();
///
/// let forecasts = rolling_var(&returns, &VaRModel::Historical, 100, 0.95).unwrap();
/// assert_eq!(forecasts.len(), 20);
/// assert_eq!(forecasts.points[0].date, dates[100]);
/// ```
pub fn rolling_var(
    returns: &ReturnSeries,
    model: &VaRModel,
    window: usize,
    alpha: f64,
) -> RiskResult<ForecastSeries> {
    if window == 0 {
        return Err(RiskError::invalid_parameter("rolling window must be at least 1"));
    }
    validate_alpha(alpha)?;

    let cleaned = returns.cleaned();
    if cleaned.is_empty() {
        return Err(RiskError::EmptyInput);
    }

    let observations = cleaned.observations();
    let values = cleaned.values();
    let steps: Vec<usize> = (window..values.len()).collect();

    let points = maybe_parallel_map(&steps, |&i| {
        model
            .estimate(&values[i - window..i], alpha)
            .map(|result| Forecast {
                date: observations[i].date,
                var: result.var,
            })
    })
    .into_iter()
    .collect::<RiskResult<Vec<_>>>()?;

    debug!(
        "rolling {} forecasts: {} steps over {} returns (window {}, alpha {})",
        model,
        points.len(),
        values.len(),
        window,
        alpha
    );

    Ok(ForecastSeries {
        method: model.method(),
        alpha,
        window,
        points,
    })
}
