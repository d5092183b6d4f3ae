//! # varback-risk
//!
//! Value-at-Risk estimation and validation for a daily return series.
//!
//! This crate provides:
//!
//! - **Series**: Dated simple returns built from close prices
//! - **VaR/ES**: Historical, parametric normal and EWMA conditional-normal
//!   estimators
//! - **Rolling**: One-step-ahead out-of-sample VaR forecasts
//! - **Backtest**: Exception counting and the Kupiec coverage test
//! - **Stress**: Mean/volatility shock scenarios and the worst trailing
//!   window
//!
//! ## Example
//!
//! ```rust
//! use chrono::{Days, NaiveDate};
//! use varback_risk::prelude::*;
//!
//! let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
//! let prices: Vec<(NaiveDate, f64)> = (0..300u64)
//!     .map(|i| (start + Days::new(i), 100.0 + ((i * 17 % 29) as f64 - 14.0) * 0.1))
//!     .collect();
//! let returns = ReturnSeries::from_prices(&prices).unwrap();
//!
//! let model = VaRModel::Ewma(EwmaParams::default());
//! let forecasts = rolling_var(&returns, &model, 250, 0.99).unwrap();
//! let backtest = backtest_var(&returns, &forecasts, 0.99).unwrap();
//! assert_eq!(backtest.n, forecasts.len());
//! ```
//!
//! ## Features
//!
//! - `parallel`: Evaluate rolling steps and stress scenarios on rayon

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::float_cmp)]
#![allow(clippy::doc_markdown)]

pub mod backtest;
mod error;
pub mod parallel;
pub mod rolling;
pub mod series;
pub mod stress;
pub mod var;

pub use error::{RiskError, RiskResult};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::backtest::{backtest_var, kupiec, BacktestPoint, BacktestResult, KupiecTest};
    pub use crate::rolling::{rolling_var, Forecast, ForecastSeries};
    pub use crate::series::{returns_from_close, Observation, ReturnSeries};
    pub use crate::stress::{
        apply_scenario, stress_test, worst_window_sum, Scenario, StressSummary, WorstWindow,
    };
    pub use crate::var::{
        ewma_var_es, ewma_volatility, historical_var_es, parametric_var_es, EwmaParams, VaRMethod,
        VaRModel, VaRResult,
    };
    pub use crate::{RiskError, RiskResult};
}
