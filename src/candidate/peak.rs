//! Scored candidate positions and their ordering.

use std::cmp::Ordering;

/// Candidate center in neighbor-frame pixel coordinates with its score.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Peak {
    /// X coordinate of the candidate center.
    pub x: i32,
    /// Y coordinate of the candidate center.
    pub y: i32,
    /// Metric score; lower is better.
    pub score: f64,
}

/// Ascending order: better candidates compare `Less`.
///
/// NaN scores sort after every number. Equal scores fall back to raster
/// order (lowest `y`, then lowest `x`), which makes the reduction independent
/// of how rows were split across workers.
pub(crate) fn peak_cmp_asc(a: &Peak, b: &Peak) -> Ordering {
    a.score
        .is_nan()
        .cmp(&b.score.is_nan())
        .then_with(|| a.score.partial_cmp(&b.score).unwrap_or(Ordering::Equal))
        .then_with(|| a.y.cmp(&b.y))
        .then_with(|| a.x.cmp(&b.x))
}

/// Running minimum over candidates.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct BestPeak {
    best: Option<Peak>,
}

impl BestPeak {
    pub(crate) fn new() -> Self {
        Self { best: None }
    }

    /// Keeps `peak` if it is strictly better than the current best.
    #[inline]
    pub(crate) fn offer(&mut self, peak: Peak) {
        match self.best {
            Some(current) if peak_cmp_asc(&peak, &current) != Ordering::Less => {}
            _ => self.best = Some(peak),
        }
    }

    pub(crate) fn get(&self) -> Option<Peak> {
        self.best
    }
}
