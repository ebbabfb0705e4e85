//! Threading helpers shared by mining, filtering and batch prediction.

use rayon::prelude::*;

// =============================================================================
// Parallelism
// =============================================================================

/// Execution mode handed down from the model API to each training phase.
///
/// Phases never build pools of their own. Under `Parallel` they fan out over
/// the pool installed by [`run_with_threads`]; under `Sequential` they stay
/// on the calling thread.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Parallelism {
    Sequential,
    Parallel,
}

impl Parallelism {
    /// Mode for a requested thread count: 1 is sequential, 0 follows the
    /// current pool, anything else is parallel.
    #[inline]
    pub fn from_threads(n_threads: usize) -> Self {
        match n_threads {
            1 => Self::Sequential,
            0 if rayon::current_num_threads() <= 1 => Self::Sequential,
            _ => Self::Parallel,
        }
    }

    #[inline]
    pub fn is_parallel(self) -> bool {
        self == Self::Parallel
    }

    /// Worker count for claim-based phases: one per pool thread.
    #[inline]
    pub fn n_workers(self) -> usize {
        if self.is_parallel() {
            rayon::current_num_threads().max(1)
        } else {
            1
        }
    }

    /// Map in input order, in parallel when allowed.
    #[inline]
    pub fn maybe_par_map<T, B, I, F>(self, items: I, f: F) -> Vec<B>
    where
        T: Send,
        B: Send,
        I: IntoIterator<Item = T> + IntoParallelIterator<Item = T>,
        F: Fn(T) -> B + Sync + Send,
    {
        match self {
            Self::Parallel => items.into_par_iter().map(f).collect(),
            Self::Sequential => items.into_iter().map(f).collect(),
        }
    }
}

// =============================================================================
// Pool Setup
// =============================================================================

/// Run `f` under the pool matching `n_threads`.
///
/// `0` uses the global pool (all cores), `1` runs on the calling thread and
/// `n > 1` installs a dedicated pool of `n` threads for the duration of `f`.
///
/// # Errors
///
/// The builder error if the dedicated pool cannot be created.
///
/// # Example
///
/// ```
/// use lord::{run_with_threads, Parallelism};
///
/// let mode = run_with_threads(1, |parallelism| parallelism).unwrap();
/// assert_eq!(mode, Parallelism::Sequential);
/// ```
pub fn run_with_threads<T: Send>(
    n_threads: usize,
    f: impl FnOnce(Parallelism) -> T + Send,
) -> Result<T, rayon::ThreadPoolBuildError> {
    match n_threads {
        0 => Ok(f(Parallelism::from_threads(0))),
        1 => Ok(f(Parallelism::Sequential)),
        n => {
            let pool = rayon::ThreadPoolBuilder::new().num_threads(n).build()?;
            Ok(pool.install(|| f(Parallelism::Parallel)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_threads() {
        assert_eq!(Parallelism::from_threads(1), Parallelism::Sequential);
        assert_eq!(Parallelism::from_threads(4), Parallelism::Parallel);
    }

    #[test]
    fn test_dedicated_pool_size() {
        let (mode, workers) = run_with_threads(3, |p| (p, p.n_workers())).unwrap();
        assert_eq!(mode, Parallelism::Parallel);
        assert_eq!(workers, 3);
        assert_eq!(Parallelism::Sequential.n_workers(), 1);
    }

    #[test]
    fn test_maybe_par_map_keeps_order() {
        let rows: Vec<Vec<u32>> = (0..50).map(|i| vec![i, i + 1]).collect();
        for mode in [Parallelism::Sequential, Parallelism::Parallel] {
            let sums = mode.maybe_par_map(&rows, |r| r.iter().sum::<u32>());
            assert_eq!(sums, (0..50).map(|i| 2 * i + 1).collect::<Vec<_>>());
        }
    }
}
