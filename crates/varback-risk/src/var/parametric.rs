//! Parametric (variance-covariance) VaR calculation.

use super::{validate_alpha, VaRMethod, VaRResult};
use crate::error::{RiskError, RiskResult};
use crate::series::clean_sample;
use varback_math::distributions::normal;
use varback_math::statistics::{mean, sample_std_dev};

/// Calculate parametric normal VaR and ES.
///
/// Fits the sample mean `µ` and the unbiased sample standard deviation `σ`
/// to `returns`. With `z = Φ⁻¹(alpha)`:
///
/// - VaR = −(µ − zσ)
/// - ES = −(µ − σφ(z)/(1 − alpha))
///
/// # Errors
///
/// Returns an error for `alpha` outside (0, 1), an empty sample, or fewer
/// than two observations (the volatility is undefined).
pub fn parametric_var_es(returns: &[f64], alpha: f64) -> RiskResult<VaRResult> {
    validate_alpha(alpha)?;
    let sample = clean_sample(returns)?;
    if sample.len() < 2 {
        return Err(RiskError::insufficient_data(2, sample.len()));
    }

    let mu = mean(&sample)?;
    let sigma = sample_std_dev(&sample)?;
    let z = normal::inverse_cdf(alpha)?;

    let var = -(mu - z * sigma);
    let es = -(mu - sigma * normal::pdf(z) / (1.0 - alpha));

    Ok(VaRResult {
        method: VaRMethod::Parametric,
        alpha,
        var,
        es,
    })
}
