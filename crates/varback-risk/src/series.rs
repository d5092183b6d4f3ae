//! Dated return series.
//!
//! A [`ReturnSeries`] is the single input every estimator, rolling forecast,
//! backtest and stress scenario consumes. It is built once from prices (or
//! from pre-computed returns) and never mutated afterwards; transformations
//! produce new series.

use chrono::NaiveDate;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{RiskError, RiskResult};

/// A single dated return.
///
/// A non-finite `value` marks a missing observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Observation date.
    pub date: NaiveDate,
    /// Simple return for the period ending on `date`.
    pub value: f64,
}

impl Observation {
    /// Creates a new observation.
    #[must_use]
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }

    /// Loss convention used throughout the crate: `-return`.
    #[must_use]
    pub fn loss(&self) -> f64 {
        -self.value
    }
}

/// Ordered series of simple returns with strictly increasing dates.
///
/// Serializes as a plain list of observations; deserializing goes through
/// [`ReturnSeries::new`] so the date order is checked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Observation>", into = "Vec<Observation>")]
pub struct ReturnSeries {
    observations: Vec<Observation>,
}

impl ReturnSeries {
    /// Creates a series, checking that dates are strictly increasing.
    ///
    /// # Errors
    ///
    /// Returns [`RiskError::UnorderedSeries`] on a duplicate or
    /// out-of-order date.
    pub fn new(observations: Vec<Observation>) -> RiskResult<Self> {
        if let Some(pair) = observations.windows(2).find(|w| w[1].date <= w[0].date) {
            return Err(RiskError::UnorderedSeries {
                previous: pair[0].date,
                next: pair[1].date,
            });
        }
        Ok(Self { observations })
    }

    /// Creates a series from parallel date and value slices.
    pub fn from_parts(dates: &[NaiveDate], values: &[f64]) -> RiskResult<Self> {
        if dates.len() != values.len() {
            return Err(RiskError::invalid_parameter(format!(
                "dates and values must have same length: {} vs {}",
                dates.len(),
                values.len()
            )));
        }
        Self::new(
            dates
                .iter()
                .zip(values)
                .map(|(&date, &value)| Observation::new(date, value))
                .collect(),
        )
    }

    /// Builds the return series of a dated close-price series.
    ///
    /// The first price has no return, so the result starts at the second
    /// date. Missing (non-finite) closes are forward-filled from the last
    /// valid close (see [`returns_from_close`]), so a gap yields a zero
    /// return followed by the full move across it. Leading missing closes
    /// and zero previous closes yield non-finite returns, which
    /// [`cleaned`](Self::cleaned) later drops.
    ///
    /// # Example
    ///
    /// ```rust
    /// use chrono::NaiveDate;
    /// use varback_risk::series::ReturnSeries;
    ///
    /// let d = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
    /// let series = ReturnSeries::from_prices(&[(d(1), 100.0), (d(2), 110.0), (d(3), 99.0)]).unwrap();
    ///
    /// assert_eq!(series.len(), 2);
    /// assert_eq!(series.dates(), vec![d(2), d(3)]);
    /// assert!((series.values()[1] + 0.1).abs() < 1e-12);
    /// ```
    pub fn from_prices(prices: &[(NaiveDate, f64)]) -> RiskResult<Self> {
        let closes: Vec<f64> = prices.iter().map(|(_, close)| *close).collect();
        let returns = returns_from_close(&closes);
        let dates: Vec<NaiveDate> = prices.iter().skip(1).map(|(date, _)| *date).collect();
        Self::from_parts(&dates, &returns)
    }

    /// Number of observations, missing ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Returns true if the series has no observations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Observations in date order.
    #[must_use]
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Iterates over observations in date order.
    pub fn iter(&self) -> std::slice::Iter<'_, Observation> {
        self.observations.iter()
    }

    /// Dates in order.
    #[must_use]
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.observations.iter().map(|o| o.date).collect()
    }

    /// Values in date order.
    #[must_use]
    pub fn values(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.value).collect()
    }

    /// Returns a copy without missing (non-finite) observations.
    #[must_use]
    pub fn cleaned(&self) -> Self {
        let observations: Vec<Observation> = self
            .observations
            .iter()
            .copied()
            .filter(|o| o.value.is_finite())
            .collect();
        let dropped = self.observations.len() - observations.len();
        if dropped > 0 {
            warn!("dropped {} missing return(s) of {}", dropped, self.len());
        }
        Self { observations }
    }

    /// Applies `f` to every value, keeping dates.
    #[must_use]
    pub fn map_values<F>(&self, f: F) -> Self
    where
        F: Fn(f64) -> f64,
    {
        Self {
            observations: self
                .observations
                .iter()
                .map(|o| Observation::new(o.date, f(o.value)))
                .collect(),
        }
    }
}

impl TryFrom<Vec<Observation>> for ReturnSeries {
    type Error = RiskError;

    fn try_from(observations: Vec<Observation>) -> RiskResult<Self> {
        Self::new(observations)
    }
}

impl From<ReturnSeries> for Vec<Observation> {
    fn from(series: ReturnSeries) -> Self {
        series.observations
    }
}

impl<'a> IntoIterator for &'a ReturnSeries {
    type Item = &'a Observation;
    type IntoIter = std::slice::Iter<'a, Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.observations.iter()
    }
}

/// Simple returns `(c[t] - c[t-1]) / c[t-1]` for `t >= 1`.
///
/// The output is one element shorter than the input; the undefined first
/// position is never emitted. Non-finite closes are first replaced by the
/// last finite close before them; those before any finite close stay
/// missing.
#[must_use]
pub fn returns_from_close(closes: &[f64]) -> Vec<f64> {
    let (filled, count) = forward_fill(closes);
    if count > 0 {
        warn!("forward-filled {} missing close(s) of {}", count, closes.len());
    }
    filled.windows(2).map(|w| (w[1] - w[0]) / w[0]).collect()
}

/// Replaces each non-finite value by the last finite one, returning the
/// filled values and how many were replaced.
fn forward_fill(values: &[f64]) -> (Vec<f64>, usize) {
    let mut last = None;
    let mut count = 0;
    let filled = values
        .iter()
        .map(|&v| {
            if v.is_finite() {
                last = Some(v);
                v
            } else if let Some(prev) = last {
                count += 1;
                prev
            } else {
                v
            }
        })
        .collect();
    (filled, count)
}

/// Drops non-finite values from a raw sample.
///
/// # Errors
///
/// Returns [`RiskError::EmptyInput`] if no finite value remains.
pub fn clean_sample(values: &[f64]) -> RiskResult<Vec<f64>> {
    let cleaned: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if cleaned.is_empty() {
        return Err(RiskError::EmptyInput);
    }
    Ok(cleaned)
}
