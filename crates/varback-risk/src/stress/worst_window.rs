//! Worst trailing window of cumulative returns.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{RiskError, RiskResult};
use crate::series::ReturnSeries;

/// The trailing window with the most negative cumulative return.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorstWindow {
    /// Date of the last observation in the window.
    pub end_date: NaiveDate,
    /// Window length in observations.
    pub window: usize,
    /// Simple (non-compounded) sum of returns over the window.
    pub cumulative_return: f64,
}

/// Finds the full trailing window with the lowest simple return sum.
///
/// Only windows with `window` observations are considered; ties keep the
/// earliest window.
///
/// # Errors
///
/// Returns [`RiskError::InvalidParameter`] for `window == 0` and
/// [`RiskError::InsufficientData`] when the cleaned series is shorter than
/// the window.
pub fn worst_window_sum(returns: &ReturnSeries, window: usize) -> RiskResult<WorstWindow> {
    if window == 0 {
        return Err(RiskError::invalid_parameter("worst-window length must be at least 1"));
    }
    let cleaned = returns.cleaned();
    let observations = cleaned.observations();
    if observations.len() < window {
        return Err(RiskError::insufficient_data(window, observations.len()));
    }

    let mut worst: Option<WorstWindow> = None;
    for span in observations.windows(window) {
        let sum: f64 = span.iter().map(|o| o.value).sum();
        if worst.map_or(true, |w| sum < w.cumulative_return) {
            worst = Some(WorstWindow {
                end_date: span[window - 1].date,
                window,
                cumulative_return: sum,
            });
        }
    }

    worst.ok_or_else(|| RiskError::insufficient_data(window, observations.len()))
}
