//! # Varback Math
//!
//! Numerical building blocks for the Varback risk library.
//!
//! This crate provides:
//!
//! - **Distributions**: Standard normal CDF, survival function, density and
//!   inverse CDF, implemented with closed-form approximations
//! - **Statistics**: Mean, sample and population variance, and
//!   linear-interpolated quantiles
//!
//! ## Design Philosophy
//!
//! - **No distribution objects**: Every approximation is written out so its
//!   error profile is fixed and testable
//! - **Numerical Stability**: Both normal tails keep relative precision
//! - **Pure functions**: No state, no allocation beyond what a sort needs

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::doc_markdown)]

pub mod distributions;
pub mod error;
pub mod statistics;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::distributions::normal;
    pub use crate::error::{MathError, MathResult};
    pub use crate::statistics::{
        histogram, mean, population_variance, quantile_sorted, sample_std_dev,
        sample_variance, HistogramBin,
    };
}

pub use error::{MathError, MathResult};
