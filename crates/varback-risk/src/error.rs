//! Error types for risk calculations.

use chrono::NaiveDate;
use thiserror::Error;
use varback_math::MathError;

/// A specialized Result type for risk calculations.
pub type RiskResult<T> = Result<T, RiskError>;

/// Errors that can occur during risk calculations.
///
/// Every variant is an input error: numeric degeneracies (no exceptions in a
/// backtest, an empty historical tail) are resolved where they occur and
/// never surface here.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RiskError {
    /// Nothing left after dropping missing observations.
    #[error("empty input: no finite returns after dropping missing values")]
    EmptyInput,

    /// Model name outside the supported set.
    #[error("unknown model: {0} (expected historical, parametric or ewma)")]
    UnknownModel(String),

    /// Confidence level that would make the math degenerate.
    #[error("invalid confidence level: {alpha} is not in (0, 1)")]
    InvalidConfidence {
        /// The rejected confidence level.
        alpha: f64,
    },

    /// No forecast/realization pairs to compare.
    #[error("backtest sample is empty: no forecast dates have a realized return")]
    EmptyBacktest,

    /// Invalid model or window parameter.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Insufficient data for calculation
    #[error("insufficient data: need at least {required} observations, got {actual}")]
    InsufficientData {
        /// Minimum number of observations.
        required: usize,
        /// Observations available.
        actual: usize,
    },

    /// Dates not strictly increasing.
    #[error("series dates must be strictly increasing: {next} follows {previous}")]
    UnorderedSeries {
        /// Earlier position's date.
        previous: NaiveDate,
        /// Offending date.
        next: NaiveDate,
    },

    /// Error from the math layer.
    #[error("math error: {0}")]
    Math(#[from] MathError),
}

impl RiskError {
    /// Creates an invalid parameter error.
    #[must_use]
    pub fn invalid_parameter(reason: impl Into<String>) -> Self {
        Self::InvalidParameter(reason.into())
    }

    /// Creates an insufficient data error.
    #[must_use]
    pub fn insufficient_data(required: usize, actual: usize) -> Self {
        Self::InsufficientData { required, actual }
    }
}
