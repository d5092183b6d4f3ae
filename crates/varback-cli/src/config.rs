//! Run configuration.
//!
//! Values come from, in increasing priority: built-in defaults, a TOML file
//! passed with `--config`, and command-line flags.
//!
//! ```toml
//! alpha = 0.975
//! window = 250
//! worst_window = 10
//!
//! [ewma]
//! lambda = 0.97
//!
//! [[scenarios]]
//! name = "Crash"
//! shock_return = -0.05
//! vol_mult = 3.0
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;
use varback_risk::prelude::{EwmaParams, Scenario, VaRMethod, VaRModel};

use crate::error::{CliError, CliResult};

/// Default confidence level.
pub const DEFAULT_ALPHA: f64 = 0.99;

/// Default rolling estimation window, in observations.
pub const DEFAULT_WINDOW: usize = 500;

/// Default worst-window length, in observations.
pub const DEFAULT_WORST_WINDOW: usize = 20;

/// Smallest rolling window accepted.
pub const MIN_WINDOW: usize = 50;

/// Settings shared by every command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// VaR/ES confidence level.
    pub alpha: f64,
    /// Rolling estimation window for backtests.
    pub window: usize,
    /// Length of the worst trailing window search.
    pub worst_window: usize,
    /// EWMA model parameters.
    pub ewma: EwmaParams,
    /// Stress scenarios, in report order.
    pub scenarios: Vec<Scenario>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            window: DEFAULT_WINDOW,
            worst_window: DEFAULT_WORST_WINDOW,
            ewma: EwmaParams::default(),
            scenarios: Scenario::standard_set(),
        }
    }
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides {
    pub alpha: Option<f64>,
    pub window: Option<usize>,
    pub lambda: Option<f64>,
    pub worst_window: Option<usize>,
}

impl RunConfig {
    /// Parses a TOML document.
    pub fn from_toml(text: &str) -> CliResult<Self> {
        toml::from_str(text).map_err(|e| CliError::config(e.to_string()))
    }

    /// Loads the configuration file, or the defaults when none is given.
    pub fn load(path: Option<&Path>) -> CliResult<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path).map_err(|e| {
            CliError::config(format!("cannot read {}: {e}", path.display()))
        })?;
        let config = Self::from_toml(&text)?;
        debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Applies command-line overrides.
    #[must_use]
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(alpha) = overrides.alpha {
            self.alpha = alpha;
        }
        if let Some(window) = overrides.window {
            self.window = window;
        }
        if let Some(lambda) = overrides.lambda {
            self.ewma.lambda = lambda;
        }
        if let Some(worst_window) = overrides.worst_window {
            self.worst_window = worst_window;
        }
        self
    }

    /// Checks the settings before any computation runs.
    pub fn validate(&self) -> CliResult<()> {
        if !(0.90..1.0).contains(&self.alpha) {
            return Err(CliError::config(format!(
                "alpha must be in [0.90, 1.0), got {}",
                self.alpha
            )));
        }
        if self.window < MIN_WINDOW {
            return Err(CliError::config(format!(
                "window must be >= {MIN_WINDOW} (need enough history), got {}",
                self.window
            )));
        }
        if self.worst_window == 0 {
            return Err(CliError::config("worst_window must be >= 1"));
        }
        if self.scenarios.is_empty() {
            return Err(CliError::config("at least one stress scenario is required"));
        }
        self.ewma.validate()?;
        for scenario in &self.scenarios {
            scenario.validate()?;
        }
        Ok(())
    }

    /// The model for `method` under this configuration.
    #[must_use]
    pub fn model(&self, method: VaRMethod) -> VaRModel {
        VaRModel::from_method(method, self.ewma)
    }

    /// Models for the requested methods, or all of them when none is given.
    #[must_use]
    pub fn models(&self, methods: &[VaRMethod]) -> Vec<VaRModel> {
        if methods.is_empty() {
            VaRModel::all(self.ewma).to_vec()
        } else {
            methods.iter().map(|&m| self.model(m)).collect()
        }
    }
}
