//! Conditional parallel iteration.
//!
//! Rolling forecast steps and stress scenarios are independent of each
//! other, so they can be mapped on rayon when the `parallel` feature is
//! enabled. Small inputs stay sequential. Output order always matches input
//! order.

/// Minimum number of items before work is spread over the rayon pool.
pub const PARALLEL_THRESHOLD: usize = 64;

/// Returns true if `len` items would be mapped in parallel.
#[must_use]
pub fn should_parallelize(len: usize) -> bool {
    cfg!(feature = "parallel") && len >= PARALLEL_THRESHOLD
}

/// Maps a function over items, conditionally using parallel iteration.
///
/// Uses parallel iteration when:
/// - The `parallel` feature is enabled
/// - The collection size reaches [`PARALLEL_THRESHOLD`]
pub fn maybe_parallel_map<T, U, F>(items: &[T], f: F) -> Vec<U>
where
    T: Sync,
    U: Send,
    F: Fn(&T) -> U + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        if should_parallelize(items.len()) {
            return items.par_iter().map(f).collect();
        }
    }

    items.iter().map(f).collect()
}
