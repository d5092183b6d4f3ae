//! VaR backtesting.
//!
//! Compares realized losses with rolling VaR forecasts, counts exceptions
//! (losses strictly above the forecast) and checks the exception rate with
//! the Kupiec test.

mod kupiec;

pub use kupiec::*;

use std::collections::HashMap;

use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{RiskError, RiskResult};
use crate::rolling::ForecastSeries;
use crate::series::{Observation, ReturnSeries};
use crate::var::VaRMethod;

/// One aligned forecast/realization pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BacktestPoint {
    /// Date of the realized return.
    pub date: NaiveDate,
    /// Realized loss (`-return`).
    pub loss: f64,
    /// Forecast VaR for the date.
    pub var: f64,
    /// Whether the loss exceeded the forecast.
    pub exception: bool,
}

/// Backtest summary for one model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    /// Model whose forecasts were tested.
    pub method: VaRMethod,
    /// Confidence level.
    pub alpha: f64,
    /// Number of forecast/realization pairs compared.
    pub n: usize,
    /// Pairs where the loss exceeded the forecast.
    pub exceptions: usize,
    /// `exceptions / n`.
    pub exception_rate: f64,
    /// Kupiec likelihood-ratio statistic.
    pub kupiec_lr: f64,
    /// Kupiec p-value.
    pub kupiec_p_value: f64,
    /// Aligned pairs in date order.
    #[serde(skip)]
    pub points: Vec<BacktestPoint>,
}

impl BacktestResult {
    /// Dates on which the forecast was exceeded.
    #[must_use]
    pub fn exception_dates(&self) -> Vec<NaiveDate> {
        self.points
            .iter()
            .filter(|p| p.exception)
            .map(|p| p.date)
            .collect()
    }

    /// Expected exception count under correct coverage.
    #[must_use]
    pub fn expected_exceptions(&self) -> f64 {
        (1.0 - self.alpha) * self.n as f64
    }
}

/// Backtests VaR forecasts against realized returns.
///
/// Forecasts are joined to the cleaned returns on date; forecast dates
/// without a realized return are skipped.
///
/// # Errors
///
/// Returns [`RiskError::EmptyBacktest`] when no date matches, and
/// [`RiskError::InvalidConfidence`] for `alpha` outside (0, 1).
pub fn backtest_var(
    returns: &ReturnSeries,
    forecasts: &ForecastSeries,
    alpha: f64,
) -> RiskResult<BacktestResult> {
    let realized: HashMap<NaiveDate, Observation> = returns
        .cleaned()
        .iter()
        .map(|o| (o.date, *o))
        .collect();

    let points: Vec<BacktestPoint> = forecasts
        .iter()
        .filter_map(|f| {
            realized.get(&f.date).map(|o| {
                let loss = o.loss();
                BacktestPoint {
                    date: f.date,
                    loss,
                    var: f.var,
                    exception: loss > f.var,
                }
            })
        })
        .collect();

    let n = points.len();
    if n == 0 {
        return Err(RiskError::EmptyBacktest);
    }
    let exceptions = points.iter().filter(|p| p.exception).count();
    let test = kupiec(exceptions, n, alpha)?;

    debug!(
        "backtest {}: {}/{} exceptions (expected {:.1}), LR={:.4}, p={:.4}",
        forecasts.method,
        exceptions,
        n,
        (1.0 - alpha) * n as f64,
        test.lr,
        test.p_value
    );

    Ok(BacktestResult {
        method: forecasts.method,
        alpha,
        n,
        exceptions,
        exception_rate: exceptions as f64 / n as f64,
        kupiec_lr: test.lr,
        kupiec_p_value: test.p_value,
        points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rolling::Forecast;
    use approx::assert_relative_eq;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, day).unwrap()
    }

    fn forecasts(points: &[(u32, f64)]) -> ForecastSeries {
        ForecastSeries {
            method: VaRMethod::Historical,
            alpha: 0.95,
            window: 50,
            points: points
                .iter()
                .map(|&(day, var)| Forecast { date: d(day), var })
                .collect(),
        }
    }

    #[test]
    fn test_counts_strict_exceptions() {
        let returns = ReturnSeries::from_parts(
            &[d(1), d(2), d(3), d(4)],
            &[-0.03, -0.02, 0.01, -0.05],
        )
        .unwrap();
        let fc = forecasts(&[(2, 0.02), (3, 0.02), (4, 0.02)]);

        let result = backtest_var(&returns, &fc, 0.95).unwrap();
        assert_eq!(result.n, 3);
        // loss equal to VaR on day 2 is not an exception
        assert_eq!(result.exceptions, 1);
        assert_eq!(result.exception_dates(), vec![d(4)]);
        assert_relative_eq!(result.exception_rate, 1.0 / 3.0);
        assert_relative_eq!(result.expected_exceptions(), 0.15, epsilon = 1e-12);
    }

    #[test]
    fn test_inner_join_skips_missing_dates() {
        let returns =
            ReturnSeries::from_parts(&[d(1), d(2), d(3)], &[0.01, f64::NAN, -0.04]).unwrap();
        let fc = forecasts(&[(2, 0.02), (3, 0.02), (9, 0.02)]);

        let result = backtest_var(&returns, &fc, 0.95).unwrap();
        assert_eq!(result.n, 1);
        assert_eq!(result.exceptions, 1);
        assert_eq!(result.points[0].date, d(3));
    }

    #[test]
    fn test_kupiec_fields_match_direct_call() {
        let returns =
            ReturnSeries::from_parts(&[d(1), d(2), d(3)], &[-0.01, -0.03, 0.02]).unwrap();
        let fc = forecasts(&[(1, 0.02), (2, 0.02), (3, 0.02)]);

        let result = backtest_var(&returns, &fc, 0.95).unwrap();
        let direct = kupiec(1, 3, 0.95).unwrap();
        assert_relative_eq!(result.kupiec_lr, direct.lr);
        assert_relative_eq!(result.kupiec_p_value, direct.p_value);
    }

    #[test]
    fn test_empty_backtest() {
        let returns = ReturnSeries::from_parts(&[d(1)], &[0.01]).unwrap();
        let fc = forecasts(&[(5, 0.02)]);
        assert_eq!(backtest_var(&returns, &fc, 0.95), Err(RiskError::EmptyBacktest));
    }
}
