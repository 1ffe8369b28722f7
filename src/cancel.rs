//! Cooperative cancellation and progress reporting.
//!
//! A `CancelToken` is cloned into whoever may request a stop (a host UI
//! thread, a signal handler) and polled by the tracker once per scan row and
//! once per range step.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared cancellation flag.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Idempotent.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Clears a previous request so the token can be reused for another run.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Receives progress from a range run.
pub trait Progress {
    /// Called after each step with the completed fraction in `(0, 1]`.
    /// Returning `false` stops the run before the next step.
    fn report(&mut self, fraction: f64) -> bool;

    /// Called after a committed step when timeline sync is enabled.
    fn set_time(&mut self, _time: i64) {}
}

/// Progress sink that ignores reports and never stops the run.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn report(&mut self, _fraction: f64) -> bool {
        true
    }
}

impl<F> Progress for F
where
    F: FnMut(f64) -> bool,
{
    fn report(&mut self, fraction: f64) -> bool {
        self(fraction)
    }
}
