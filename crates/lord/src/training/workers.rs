//! Row partitioning for the mining and filtering phases.
//!
//! Workers pull row indices one at a time from a shared atomic cursor, so
//! rows with expensive searches do not stall a statically assigned chunk.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::OnceLock;

use crate::utils::Parallelism;

/// Run `work` over `0..n_items`, one claimed index at a time.
///
/// Each worker starts from `init()` and its final state is returned; the
/// order of the returned states is unspecified. When parallel, one worker
/// runs on every thread of the current rayon pool.
///
/// # Errors
///
/// The first error raised by any worker. Workers stop claiming new indices
/// once an error is recorded.
pub fn run_claiming_workers<S, E, I, W>(
    n_items: usize,
    parallelism: Parallelism,
    init: I,
    work: W,
) -> Result<Vec<S>, E>
where
    S: Send,
    E: Send + Sync,
    I: Fn() -> S + Sync,
    W: Fn(&mut S, usize) -> Result<(), E> + Sync,
{
    let cursor = AtomicUsize::new(0);
    let aborted = AtomicBool::new(false);
    let first_error: OnceLock<E> = OnceLock::new();

    let worker = || {
        let mut state = init();
        while !aborted.load(Ordering::Relaxed) {
            let idx = cursor.fetch_add(1, Ordering::Relaxed);
            if idx >= n_items {
                break;
            }
            if let Err(e) = work(&mut state, idx) {
                let _ = first_error.set(e);
                aborted.store(true, Ordering::Relaxed);
                break;
            }
        }
        state
    };

    let states = if parallelism.is_parallel() {
        rayon::broadcast(|_| worker())
    } else {
        vec![worker()]
    };

    match first_error.into_inner() {
        Some(e) => Err(e),
        None => Ok(states),
    }
}
