//! EWMA conditional-normal VaR calculation.

use serde::{Deserialize, Serialize};

use super::{validate_alpha, VaRMethod, VaRResult};
use crate::error::{RiskError, RiskResult};
use crate::series::clean_sample;
use varback_math::distributions::normal;
use varback_math::statistics::population_variance;

/// RiskMetrics daily decay factor.
pub const DEFAULT_LAMBDA: f64 = 0.94;

/// Number of leading returns used to seed the variance recursion.
pub const DEFAULT_SEED_WINDOW: usize = 30;

/// Parameters of the EWMA volatility recursion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EwmaParams {
    /// Decay factor λ in (0, 1).
    pub lambda: f64,
    /// Leading returns whose variance seeds the recursion.
    pub seed_window: usize,
}

impl Default for EwmaParams {
    fn default() -> Self {
        Self {
            lambda: DEFAULT_LAMBDA,
            seed_window: DEFAULT_SEED_WINDOW,
        }
    }
}

impl EwmaParams {
    /// Creates parameters with the given decay and the default seed window.
    #[must_use]
    pub fn with_lambda(lambda: f64) -> Self {
        Self {
            lambda,
            ..Self::default()
        }
    }

    /// Validates the parameters.
    pub fn validate(&self) -> RiskResult<()> {
        if !(self.lambda > 0.0 && self.lambda < 1.0) {
            return Err(RiskError::invalid_parameter(format!(
                "EWMA lambda must be in (0, 1), got {}",
                self.lambda
            )));
        }
        if self.seed_window == 0 {
            return Err(RiskError::invalid_parameter(
                "EWMA seed window must be at least 1",
            ));
        }
        Ok(())
    }
}

/// EWMA volatility path.
///
/// `σ²[0]` is the population variance of the first `seed_window` returns
/// (the whole sample if shorter) and
/// `σ²[t] = λσ²[t−1] + (1−λ)r[t−1]²` for `t ≥ 1`. The output has one
/// volatility (not variance) per cleaned return.
pub fn ewma_volatility(returns: &[f64], params: &EwmaParams) -> RiskResult<Vec<f64>> {
    params.validate()?;
    let sample = clean_sample(returns)?;

    let seed = &sample[..sample.len().min(params.seed_window)];
    let mut variance = population_variance(seed)?;

    let mut path = Vec::with_capacity(sample.len());
    path.push(variance.sqrt());
    for r in &sample[..sample.len() - 1] {
        variance = params.lambda * variance + (1.0 - params.lambda) * r * r;
        path.push(variance.sqrt());
    }
    Ok(path)
}

/// Calculate EWMA conditional-normal VaR and ES.
///
/// Uses the most recent volatility of [`ewma_volatility`] and a zero
/// conditional mean: VaR = zσ and ES = σφ(z)/(1 − alpha) with
/// `z = Φ⁻¹(alpha)`.
pub fn ewma_var_es(returns: &[f64], alpha: f64, params: &EwmaParams) -> RiskResult<VaRResult> {
    validate_alpha(alpha)?;
    let sigma = ewma_volatility(returns, params)?
        .last()
        .copied()
        .ok_or(RiskError::EmptyInput)?;
    let z = normal::inverse_cdf(alpha)?;

    Ok(VaRResult {
        method: VaRMethod::Ewma,
        alpha,
        var: z * sigma,
        es: sigma * normal::pdf(z) / (1.0 - alpha),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_volatility_recursion() {
        let returns = [0.01, -0.02, 0.03];
        let params = EwmaParams::default();
        let path = ewma_volatility(&returns, &params).unwrap();

        // seed: population variance of the whole (short) sample
        let mu: f64 = 0.02 / 3.0;
        let s0 = ((0.01 - mu).powi(2) + (-0.02 - mu).powi(2) + (0.03 - mu).powi(2)) / 3.0;
        let s1 = 0.94 * s0 + 0.06 * 0.01 * 0.01;
        let s2 = 0.94 * s1 + 0.06 * 0.02 * 0.02;

        assert_eq!(path.len(), 3);
        assert_relative_eq!(path[0], s0.sqrt(), epsilon = 1e-14);
        assert_relative_eq!(path[1], s1.sqrt(), epsilon = 1e-14);
        assert_relative_eq!(path[2], s2.sqrt(), epsilon = 1e-14);
    }

    #[test]
    fn test_seed_uses_first_window_only() {
        let mut returns = vec![0.0; 30];
        returns.extend([0.5, -0.5]);
        let path = ewma_volatility(&returns, &EwmaParams::default()).unwrap();
        assert_eq!(path[0], 0.0);
        // The final return does not enter the final volatility
        let expected = (0.06f64 * 0.25).sqrt();
        assert_relative_eq!(*path.last().unwrap(), expected, epsilon = 1e-14);
    }

    #[test]
    fn test_ewma_var_es() {
        let returns: Vec<f64> = (0..100).map(|i| if i % 2 == 0 { 0.01 } else { -0.01 }).collect();
        let params = EwmaParams::default();
        let sigma = *ewma_volatility(&returns, &params).unwrap().last().unwrap();
        let result = ewma_var_es(&returns, 0.99, &params).unwrap();

        assert_relative_eq!(result.var, 2.3263478740408408 * sigma, epsilon = 1e-9);
        assert_relative_eq!(result.es, 2.665214220345808 * sigma, epsilon = 1e-9);
        assert_eq!(result.method, VaRMethod::Ewma);
    }

    #[test]
    fn test_lambda_is_configurable() {
        let returns: Vec<f64> = (0..60).map(|i| 0.001 * f64::from(i % 7) - 0.003).collect();
        let slow = ewma_var_es(&returns, 0.99, &EwmaParams::with_lambda(0.97)).unwrap();
        let fast = ewma_var_es(&returns, 0.99, &EwmaParams::with_lambda(0.80)).unwrap();
        assert_ne!(slow.var, fast.var);
    }

    #[test]
    fn test_invalid_params() {
        assert!(ewma_volatility(&[0.01], &EwmaParams::with_lambda(1.0)).is_err());
        assert!(ewma_volatility(&[0.01], &EwmaParams::with_lambda(0.0)).is_err());
        let params = EwmaParams {
            lambda: 0.94,
            seed_window: 0,
        };
        assert!(ewma_volatility(&[0.01], &params).is_err());
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(
            ewma_var_es(&[f64::NAN], 0.99, &EwmaParams::default()),
            Err(RiskError::EmptyInput)
        );
    }
}
