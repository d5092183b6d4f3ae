//! Probability distributions.
//!
//! Only the standard normal is needed: the parametric and EWMA models take
//! their quantile from it and the Kupiec test takes its chi-square(1) tail
//! from it.

pub mod normal;
