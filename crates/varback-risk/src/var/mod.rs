//! Value at Risk (VaR) and Expected Shortfall (ES) estimators.
//!
//! VaR is the loss threshold exceeded with probability `1 - alpha` over one
//! period; ES is the mean loss given that the threshold is exceeded. Losses
//! are `-return`, so both figures are positive for a loss.
//!
//! Three models are provided:
//!
//! - [`historical_var_es`]: empirical quantile of the loss sample
//! - [`parametric_var_es`]: normal fit with sample mean and volatility
//! - [`ewma_var_es`]: zero-mean normal with EWMA conditional volatility
//!
//! [`VaRModel`] tags a model with its parameters so callers (the rolling
//! forecaster, the stress engine) dispatch through one exhaustive match.

mod ewma;
mod historical;
mod parametric;

pub use ewma::*;
pub use historical::*;
pub use parametric::*;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{RiskError, RiskResult};

/// Value at Risk result
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VaRResult {
    /// Method used for calculation
    pub method: VaRMethod,
    /// Confidence level (e.g., 0.99 for 99%)
    pub alpha: f64,
    /// Loss threshold, as a fraction of position value
    pub var: f64,
    /// Mean loss beyond the threshold, as a fraction of position value
    pub es: f64,
}

impl fmt::Display for VaRResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} VaR({:.0}%): {:.4}%, ES: {:.4}%",
            self.method,
            self.alpha * 100.0,
            self.var * 100.0,
            self.es * 100.0
        )
    }
}

/// VaR calculation method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VaRMethod {
    /// Historical simulation
    Historical,
    /// Parametric normal (variance-covariance)
    Parametric,
    /// EWMA conditional normal
    Ewma,
}

impl VaRMethod {
    /// All methods, in report order.
    pub const ALL: [VaRMethod; 3] = [Self::Historical, Self::Parametric, Self::Ewma];

    /// Short name used on the command line and in file names.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Historical => "historical",
            Self::Parametric => "parametric",
            Self::Ewma => "ewma",
        }
    }

    /// Descriptive name used in reports.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Historical => "historical",
            Self::Parametric => "parametric_normal",
            Self::Ewma => "ewma_conditional_normal",
        }
    }
}

impl fmt::Display for VaRMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VaRMethod {
    type Err = RiskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "historical" => Ok(Self::Historical),
            "parametric" => Ok(Self::Parametric),
            "ewma" => Ok(Self::Ewma),
            _ => Err(RiskError::UnknownModel(s.to_string())),
        }
    }
}

/// A VaR model together with its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum VaRModel {
    /// Empirical quantile of losses.
    Historical,
    /// Normal with sample mean and standard deviation.
    Parametric,
    /// Zero-mean normal with EWMA volatility.
    Ewma(EwmaParams),
}

impl VaRModel {
    /// Builds the model for `method`, using `ewma` when it needs parameters.
    #[must_use]
    pub fn from_method(method: VaRMethod, ewma: EwmaParams) -> Self {
        match method {
            VaRMethod::Historical => Self::Historical,
            VaRMethod::Parametric => Self::Parametric,
            VaRMethod::Ewma => Self::Ewma(ewma),
        }
    }

    /// All three models, the EWMA one with the given parameters.
    #[must_use]
    pub fn all(ewma: EwmaParams) -> [VaRModel; 3] {
        VaRMethod::ALL.map(|m| Self::from_method(m, ewma))
    }

    /// The method this model implements.
    #[must_use]
    pub fn method(&self) -> VaRMethod {
        match self {
            Self::Historical => VaRMethod::Historical,
            Self::Parametric => VaRMethod::Parametric,
            Self::Ewma(_) => VaRMethod::Ewma,
        }
    }

    /// Estimates VaR and ES on `returns` at confidence `alpha`.
    pub fn estimate(&self, returns: &[f64], alpha: f64) -> RiskResult<VaRResult> {
        match self {
            Self::Historical => historical_var_es(returns, alpha),
            Self::Parametric => parametric_var_es(returns, alpha),
            Self::Ewma(params) => ewma_var_es(returns, alpha, params),
        }
    }
}

impl fmt::Display for VaRModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ewma(params) => write!(f, "ewma(lambda={})", params.lambda),
            other => write!(f, "{}", other.method()),
        }
    }
}

impl FromStr for VaRModel {
    type Err = RiskError;

    /// Parses a model name; EWMA gets default parameters.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<VaRMethod>()
            .map(|m| Self::from_method(m, EwmaParams::default()))
    }
}

/// Checks `0 < alpha < 1`.
pub(crate) fn validate_alpha(alpha: f64) -> RiskResult<()> {
    if alpha > 0.0 && alpha < 1.0 {
        Ok(())
    } else {
        Err(RiskError::InvalidConfidence { alpha })
    }
}
