//! Historical VaR calculation.

use super::{validate_alpha, VaRMethod, VaRResult};
use crate::error::RiskResult;
use crate::series::clean_sample;
use varback_math::statistics::quantile_sorted;

/// Calculate historical VaR and ES from a series of returns.
///
/// VaR is the `alpha` quantile of the empirical loss distribution, linearly
/// interpolated between order statistics. ES is the mean of all losses at or
/// beyond VaR; if no loss reaches the threshold ES falls back to VaR itself.
///
/// # Arguments
///
/// * `returns` - Historical returns (as decimals, e.g., -0.01 for -1%);
///   non-finite entries are dropped
/// * `alpha` - Confidence level (e.g., 0.99 for 99%)
///
/// # Example
///
/// ```rust
/// use varback_risk::var::historical_var_es;
///
/// let returns = [0.01, -0.02, 0.015, -0.005, 0.02];
/// let result = historical_var_es(&returns, 0.95).unwrap();
/// assert!((result.var - 0.017).abs() < 1e-12);
/// assert!(result.es >= result.var);
/// ```
pub fn historical_var_es(returns: &[f64], alpha: f64) -> RiskResult<VaRResult> {
    validate_alpha(alpha)?;
    let mut losses: Vec<f64> = clean_sample(returns)?.into_iter().map(|r| -r).collect();
    losses.sort_by(f64::total_cmp);

    let var = quantile_sorted(&losses, alpha)?;

    let tail = &losses[losses.partition_point(|&l| l < var)..];
    let es = if tail.is_empty() {
        var
    } else {
        tail.iter().sum::<f64>() / tail.len() as f64
    };

    Ok(VaRResult {
        method: VaRMethod::Historical,
        alpha,
        var,
        es,
    })
}
