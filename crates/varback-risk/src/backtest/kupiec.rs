//! Kupiec unconditional-coverage test.

use serde::{Deserialize, Serialize};

use crate::error::{RiskError, RiskResult};
use crate::var::validate_alpha;
use varback_math::distributions::normal;

/// Observed rate substituted at the boundaries to keep both log-likelihoods
/// finite.
const BOUNDARY_EPSILON: f64 = 1e-7;

/// Outcome of the Kupiec proportion-of-failures test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KupiecTest {
    /// Exceptions used (clamped to `n`).
    pub exceptions: usize,
    /// Number of trials.
    pub n: usize,
    /// Exception probability under the null, `1 - alpha`.
    pub expected_rate: f64,
    /// Observed exception rate `exceptions / n`.
    pub observed_rate: f64,
    /// Likelihood-ratio statistic, chi-square(1) under the null.
    pub lr: f64,
    /// Tail probability of `lr` under chi-square(1).
    pub p_value: f64,
}

impl KupiecTest {
    /// Returns true if correct coverage is rejected at `significance`.
    #[must_use]
    pub fn rejects(&self, significance: f64) -> bool {
        self.p_value < significance
    }
}

/// Kupiec unconditional coverage test (1 degree of freedom).
///
/// With `p = 1 - alpha` and `x = min(exceptions, n)`:
///
/// - `LL0 = (n−x)·ln(1−p) + x·ln(p)`
/// - `LL1 = (n−x)·ln(1−p̂) + x·ln(p̂)` with `p̂ = x/n`, replaced by `1e-7`
///   when `x = 0` and `1 − 1e-7` when `x = n`
/// - `LR = −2·(LL0 − LL1)`
///
/// The p-value uses chi-square(1) = Z², i.e. `2·(1 − Φ(√LR))`, clamped to
/// `[0, 1]`.
///
/// # Errors
///
/// Returns [`RiskError::EmptyBacktest`] for `n == 0` and
/// [`RiskError::InvalidConfidence`] for `alpha` outside (0, 1).
///
/// # Example
///
/// ```rust
/// use varback_risk::backtest::kupiec;
///
/// let test = kupiec(5, 500, 0.99).unwrap();
/// assert!(test.lr < 1e-9);
/// assert!(test.p_value > 0.999);
/// ```
pub fn kupiec(exceptions: usize, n: usize, alpha: f64) -> RiskResult<KupiecTest> {
    if n == 0 {
        return Err(RiskError::EmptyBacktest);
    }
    validate_alpha(alpha)?;

    let p = 1.0 - alpha;
    let x = exceptions.min(n);
    let (nf, xf) = (n as f64, x as f64);

    let p_hat = if x == 0 {
        BOUNDARY_EPSILON
    } else if x == n {
        1.0 - BOUNDARY_EPSILON
    } else {
        xf / nf
    };

    let ll0 = (nf - xf) * (1.0 - p).ln() + xf * p.ln();
    let ll1 = (nf - xf) * (1.0 - p_hat).ln() + xf * p_hat.ln();
    // LL1 is the unconstrained maximum; clamp rounding noise below zero.
    let lr = (-2.0 * (ll0 - ll1)).max(0.0);

    let p_value = (2.0 * normal::survival(lr.sqrt())).clamp(0.0, 1.0);

    Ok(KupiecTest {
        exceptions: x,
        n,
        expected_rate: p,
        observed_rate: xf / nf,
        lr,
        p_value,
    })
}
