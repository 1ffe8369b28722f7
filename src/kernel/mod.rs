//! Candidate scoring kernels.
//!
//! Each metric is a zero-sized type implementing [`Kernel`]. The tracker
//! picks the kernel once per step from the runtime [`Metric`] and the scan is
//! monomorphised over it, so the innermost loops contain no metric dispatch.
//! Scores follow one convention for all metrics: lower is better.

use crate::image::{ImageView, Sample};
use crate::pattern::Pattern;

/// Correlation metric used to compare the pattern with a candidate window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Metric {
    /// Weighted sum of squared differences (weights squared).
    #[default]
    Ssd,
    /// Weighted sum of absolute differences.
    Sad,
    /// Negated cross-correlation normalised by the candidate energy.
    Ncc,
    /// Zero-mean variant of `Ncc`.
    Zncc,
}

impl Metric {
    pub fn name(self) -> &'static str {
        match self {
            Metric::Ssd => "ssd",
            Metric::Sad => "sad",
            Metric::Ncc => "ncc",
            Metric::Zncc => "zncc",
        }
    }
}

/// Scores one candidate placement of a pattern.
pub trait Kernel: Send + Sync {
    const METRIC: Metric;

    /// Score of the pattern centered at `(cx, cy)` in `image`.
    ///
    /// The image is sampled with clamp-to-edge, so every candidate position
    /// yields a finite window. Only the pattern's scored components are read.
    fn score_at<T: Sample>(image: &ImageView<'_, T>, pattern: &Pattern, cx: i32, cy: i32) -> f64;
}

pub mod scalar;

#[cfg(feature = "rayon")]
pub mod rayon;
