//! Exhaustive search of a candidate window.
//!
//! The scan evaluates the kernel at every integer candidate center of a
//! [`SearchWindow`] and reduces to the single best candidate. Rows are split
//! into bands; each band keeps a local best and folds it into the shared
//! result exactly once.

use crate::candidate::peak::Peak;
use crate::pattern::PatternWindow;

pub(crate) mod scan;

/// Inclusive range of candidate centers in neighbor-frame pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchWindow {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl SearchWindow {
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Candidate centers for which the pattern footprint stays inside the
    /// search area, both placed around `center`.
    ///
    /// Returns `None` when the search area is smaller than the pattern on
    /// either axis, or when a bound does not fit in `i32`.
    pub fn around(center: (i32, i32), pattern: PatternWindow, search: PatternWindow) -> Option<Self> {
        let (cx, cy) = center;
        let bound = |c: i32, s: i32, p: i32| c.checked_add(s)?.checked_sub(p);
        let window = Self {
            x0: bound(cx, search.x1, pattern.x1)?,
            y0: bound(cy, search.y1, pattern.y1)?,
            x1: bound(cx, search.x2, pattern.x2)?,
            y1: bound(cy, search.y2, pattern.y2)?,
        };
        (!window.is_empty()).then_some(window)
    }

    pub fn is_empty(&self) -> bool {
        self.x1 < self.x0 || self.y1 < self.y0
    }

    pub fn cols(&self) -> usize {
        (self.x1 - self.x0 + 1).max(0) as usize
    }

    pub fn rows(&self) -> usize {
        (self.y1 - self.y0 + 1).max(0) as usize
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x0 && x <= self.x1 && y >= self.y0 && y <= self.y1
    }
}

/// Scan scheduling options.
#[derive(Clone, Copy, Debug)]
pub struct ScanConfig {
    /// Distribute row bands over the rayon pool (requires the `rayon` feature).
    pub parallel: bool,
    /// Rows per band; 0 splits the window evenly over the available threads.
    pub band_rows: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            band_rows: 0,
        }
    }
}

/// Result of scanning one window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScanOutcome {
    /// Best candidate over the whole window.
    Found(Peak),
    /// The window had no candidates.
    Empty,
    /// Cancellation was requested while scanning.
    Cancelled,
}
