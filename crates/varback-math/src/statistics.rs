//! Descriptive statistics over `f64` samples.
//!
//! Callers are expected to pass finite values; cleaning of missing
//! observations happens one level up, where the domain decides what
//! "missing" means.

use crate::error::{MathError, MathResult};

/// Arithmetic mean.
///
/// # Errors
///
/// Returns [`MathError::InsufficientData`] for an empty sample.
pub fn mean(values: &[f64]) -> MathResult<f64> {
    if values.is_empty() {
        return Err(MathError::insufficient_data(1, 0));
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population variance (divides by `n`).
///
/// # Errors
///
/// Returns [`MathError::InsufficientData`] for an empty sample.
pub fn population_variance(values: &[f64]) -> MathResult<f64> {
    let mu = mean(values)?;
    Ok(sum_sq_dev(values, mu) / values.len() as f64)
}

/// Unbiased sample variance (divides by `n - 1`).
///
/// # Errors
///
/// Returns [`MathError::InsufficientData`] for fewer than two values.
pub fn sample_variance(values: &[f64]) -> MathResult<f64> {
    if values.len() < 2 {
        return Err(MathError::insufficient_data(2, values.len()));
    }
    let mu = mean(values)?;
    Ok(sum_sq_dev(values, mu) / (values.len() - 1) as f64)
}

/// Unbiased sample standard deviation.
///
/// # Errors
///
/// Returns [`MathError::InsufficientData`] for fewer than two values.
pub fn sample_std_dev(values: &[f64]) -> MathResult<f64> {
    sample_variance(values).map(f64::sqrt)
}

fn sum_sq_dev(values: &[f64], mu: f64) -> f64 {
    values.iter().map(|v| (v - mu) * (v - mu)).sum()
}

/// Quantile of an ascending-sorted sample with linear interpolation between
/// order statistics.
///
/// The position is `p * (n - 1)`, the convention used by most numerical
/// packages for their default quantile.
///
/// # Errors
///
/// Returns an error for an empty sample or for `p` outside `[0, 1]`.
///
/// # Example
///
/// ```rust
/// use varback_math::statistics::quantile_sorted;
///
/// let sorted = [1.0, 2.0, 3.0, 4.0, 5.0];
/// assert_eq!(quantile_sorted(&sorted, 0.5).unwrap(), 3.0);
/// assert!((quantile_sorted(&sorted, 0.9).unwrap() - 4.6).abs() < 1e-12);
/// ```
pub fn quantile_sorted(sorted: &[f64], p: f64) -> MathResult<f64> {
    if sorted.is_empty() {
        return Err(MathError::insufficient_data(1, 0));
    }
    if !(0.0..=1.0).contains(&p) {
        return Err(MathError::invalid_input(format!(
            "quantile level {p} is not in [0, 1]"
        )));
    }

    let n = sorted.len();
    let pos = p * (n - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        return Ok(sorted[lo]);
    }
    let w = pos - lo as f64;
    Ok(sorted[lo] + w * (sorted[hi] - sorted[lo]))
}

/// Sorts a copy of `values` and returns its quantile.
///
/// # Errors
///
/// Same as [`quantile_sorted`].
pub fn quantile(values: &[f64], p: f64) -> MathResult<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    quantile_sorted(&sorted, p)
}

/// One equal-width histogram bin, `[lower, upper)`; the last bin also
/// holds `upper`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    /// Inclusive lower edge.
    pub lower: f64,
    /// Upper edge.
    pub upper: f64,
    /// Values falling in the bin.
    pub count: usize,
}

/// Counts finite values into `bins` equal-width bins spanning their range.
///
/// A sample with a single distinct value is centered in a range of width
/// one. Non-finite values are ignored.
///
/// # Errors
///
/// Returns [`MathError::InvalidInput`] for `bins == 0` and
/// [`MathError::InsufficientData`] when no finite value is given.
///
/// # Example
///
/// ```rust
/// use varback_math::statistics::histogram;
///
/// let bins = histogram(&[0.0, 0.1, 0.2, 0.9, 1.0], 2).unwrap();
/// assert_eq!(bins[0].count, 3);
/// assert_eq!(bins[1].count, 2);
/// assert_eq!(bins[1].upper, 1.0);
/// ```
pub fn histogram(values: &[f64], bins: usize) -> MathResult<Vec<HistogramBin>> {
    if bins == 0 {
        return Err(MathError::invalid_input("histogram needs at least one bin"));
    }
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return Err(MathError::insufficient_data(1, 0));
    }

    let (mut lo, mut hi) = finite
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;

    let mut counts = vec![0usize; bins];
    for v in &finite {
        let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }

    Ok(counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: lo + width * i as f64,
            upper: if i + 1 == bins { hi } else { lo + width * (i + 1) as f64 },
            count,
        })
        .collect())
}
