//! Reference pattern extraction.
//!
//! A `Pattern` is the block of reference pixels around the tracked point,
//! stored with one weight per pixel. It is built once per step and then read
//! by every candidate evaluation, so the per-step statistics (weight total
//! and the weighted reference mean used by ZNCC) are computed here.

use crate::image::sampler::{sample, BorderPolicy};
use crate::image::{FrameView, ImageView, PixelRect, Sample};

/// Maximum number of components that take part in scoring (RGB).
pub const MAX_SCORED_COMPONENTS: usize = 3;

/// Inclusive integer offsets of a pattern or search area around a center.
///
/// `x1..=x2` by `y1..=y2`, so `(-2, -2, 2, 2)` is a 5x5 block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PatternWindow {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl PatternWindow {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Square window `-radius..=radius` on both axes.
    pub fn square(radius: i32) -> Self {
        Self::new(-radius, -radius, radius, radius)
    }

    pub fn width(&self) -> usize {
        (self.x2 - self.x1 + 1).max(0) as usize
    }

    pub fn height(&self) -> usize {
        (self.y2 - self.y1 + 1).max(0) as usize
    }

    pub fn is_degenerate(&self) -> bool {
        self.x2 < self.x1 || self.y2 < self.y1
    }

    /// Pixel rectangle covered by the window placed at `(cx, cy)`.
    ///
    /// Corners saturate at the `i32` range.
    pub fn placed_at(&self, cx: i32, cy: i32) -> PixelRect {
        PixelRect::new(
            cx.saturating_add(self.x1),
            cy.saturating_add(self.y1),
            cx.saturating_add(self.x2).saturating_add(1),
            cy.saturating_add(self.y2).saturating_add(1),
        )
    }
}

/// Why a pattern could not be extracted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExtractError {
    /// Empty window, or no overlap with the reference frame.
    Degenerate,
    /// Every pixel has zero weight.
    ZeroWeight,
}

/// Reference samples and weights for one tracking step.
#[derive(Clone, Debug)]
pub struct Pattern {
    window: PatternWindow,
    components: usize,
    samples: Vec<f64>,
    weights: Vec<f64>,
    weight_total: f64,
    mean: [f64; MAX_SCORED_COMPONENTS],
}

impl Pattern {
    /// Extracts the pattern around `center` from `reference`.
    ///
    /// Pixels are visited row-major over the inclusive window. A pixel outside
    /// the reference frame gets weight 0 and samples 0. Without a mask every
    /// in-frame pixel has weight 1; with a mask the weight is the mask value
    /// at the same position (0 where the mask has no pixel). Samples stay in
    /// native units of `T`.
    pub fn extract<T: Sample>(
        reference: &ImageView<'_, T>,
        mask: Option<&FrameView<'_>>,
        window: PatternWindow,
        center: (i32, i32),
    ) -> Result<Self, ExtractError> {
        if window.is_degenerate() {
            return Err(ExtractError::Degenerate);
        }
        let (cx, cy) = center;
        if window
            .placed_at(cx, cy)
            .intersect(&reference.bounds())
            .is_empty()
        {
            return Err(ExtractError::Degenerate);
        }

        let components = reference.components().min(MAX_SCORED_COMPONENTS);
        let count = window.width() * window.height();
        let mut samples = vec![0.0f64; count * components];
        let mut weights = vec![0.0f64; count];
        let mut weight_total = 0.0f64;
        let mut weighted_sum = [0.0f64; MAX_SCORED_COMPONENTS];

        let mut idx = 0usize;
        for i in window.y1..=window.y2 {
            for j in window.x1..=window.x2 {
                let (x, y) = (cx + j, cy + i);
                if let Some(px) = sample(reference, x, y, BorderPolicy::Strict) {
                    let weight = match mask {
                        None => 1.0,
                        Some(mask) => mask.weight_at(x, y).unwrap_or(0.0),
                    };
                    let base = idx * components;
                    for c in 0..components {
                        let value = px[c].to_f64();
                        samples[base + c] = value;
                        weighted_sum[c] += weight * value;
                    }
                    weights[idx] = weight;
                    weight_total += weight;
                }
                idx += 1;
            }
        }

        if weight_total <= 0.0 {
            return Err(ExtractError::ZeroWeight);
        }

        let mut mean = [0.0f64; MAX_SCORED_COMPONENTS];
        for c in 0..components {
            mean[c] = weighted_sum[c] / weight_total;
        }

        Ok(Self {
            window,
            components,
            samples,
            weights,
            weight_total,
            mean,
        })
    }

    pub fn window(&self) -> PatternWindow {
        self.window
    }

    pub fn width(&self) -> usize {
        self.window.width()
    }

    pub fn height(&self) -> usize {
        self.window.height()
    }

    /// Number of components stored per pixel, at most 3.
    pub fn components(&self) -> usize {
        self.components
    }

    /// Samples in row-major order, `components` per pixel.
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Weights in row-major order, one per pixel.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn weight_total(&self) -> f64 {
        self.weight_total
    }

    /// Weighted mean of each scored component over the pattern.
    pub fn mean(&self) -> &[f64] {
        &self.mean[..self.components]
    }
}
