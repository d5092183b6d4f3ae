//! Stress scenario definitions.

use serde::{Deserialize, Serialize};

use crate::error::{RiskError, RiskResult};

/// A mean/volatility shock applied to a return series.
///
/// Returns are rescaled around their own mean by `vol_mult` and then shifted
/// by `shock_return`, so the two shocks compose independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario name.
    pub name: String,
    /// Additive shift of every return (e.g., -0.01 for -1% per day).
    pub shock_return: f64,
    /// Multiplier on dispersion around the mean.
    pub vol_mult: f64,
}

impl Scenario {
    /// Creates a new scenario.
    #[must_use]
    pub fn new(name: impl Into<String>, shock_return: f64, vol_mult: f64) -> Self {
        Self {
            name: name.into(),
            shock_return,
            vol_mult,
        }
    }

    /// No shock.
    #[must_use]
    pub fn base() -> Self {
        Self::new("Base", 0.0, 1.0)
    }

    /// -1% daily drift, volatility up 30%.
    #[must_use]
    pub fn mild() -> Self {
        Self::new("Mild", -0.01, 1.3)
    }

    /// -3% daily drift, volatility doubled.
    #[must_use]
    pub fn severe() -> Self {
        Self::new("Severe", -0.03, 2.0)
    }

    /// Base, Mild and Severe.
    #[must_use]
    pub fn standard_set() -> Vec<Scenario> {
        vec![Self::base(), Self::mild(), Self::severe()]
    }

    /// Returns true if the scenario leaves returns unchanged.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.shock_return == 0.0 && self.vol_mult == 1.0
    }

    /// Validates the scenario.
    pub fn validate(&self) -> RiskResult<()> {
        if !self.shock_return.is_finite() {
            return Err(RiskError::invalid_parameter(format!(
                "scenario '{}': shock_return must be finite",
                self.name
            )));
        }
        if !self.vol_mult.is_finite() || self.vol_mult < 0.0 {
            return Err(RiskError::invalid_parameter(format!(
                "scenario '{}': vol_mult must be finite and non-negative, got {}",
                self.name, self.vol_mult
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_set() {
        let set = Scenario::standard_set();
        let names: Vec<&str> = set.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Base", "Mild", "Severe"]);
        assert!(set[0].is_identity());
        assert!(!set[2].is_identity());
    }

    #[test]
    fn test_validate() {
        assert!(Scenario::severe().validate().is_ok());
        assert!(Scenario::new("bad", 0.0, -1.0).validate().is_err());
        assert!(Scenario::new("bad", f64::NAN, 1.0).validate().is_err());
    }

    #[test]
    fn test_serde_round_trip() {
        let json = r#"{"name":"Crash","shock_return":-0.05,"vol_mult":3.0}"#;
        let scenario: Scenario = serde_json::from_str(json).unwrap();
        assert_eq!(scenario, Scenario::new("Crash", -0.05, 3.0));
    }
}
