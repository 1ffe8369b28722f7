//! Canonical-space geometry and the canonical/pixel mapping.

use crate::pattern::PatternWindow;
use crate::util::math::round_half_up;
use std::ops::{Add, Sub};

/// Point in canonical (resolution-independent) coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const ZERO: Point2 = Point2 { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Add for Point2 {
    type Output = Point2;

    fn add(self, rhs: Point2) -> Point2 {
        Point2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point2 {
    type Output = Point2;

    fn sub(self, rhs: Point2) -> Point2 {
        Point2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Rectangle of canonical offsets from a track center.
///
/// `(x1, y1)` is the low corner and `(x2, y2)` the high corner; both are
/// included when converted to pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CanonicalRect {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl CanonicalRect {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Square `-half..=half` on both axes.
    pub fn square(half: f64) -> Self {
        Self::new(-half, -half, half, half)
    }
}

/// Conversion between canonical coordinates and pixels of a rendered frame.
///
/// `px = x * render_scale_x / pixel_aspect`, `py = y * render_scale_y`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordinateMapping {
    pub render_scale_x: f64,
    pub render_scale_y: f64,
    pub pixel_aspect: f64,
}

impl Default for CoordinateMapping {
    fn default() -> Self {
        Self {
            render_scale_x: 1.0,
            render_scale_y: 1.0,
            pixel_aspect: 1.0,
        }
    }
}

impl CoordinateMapping {
    fn sx(&self) -> f64 {
        self.render_scale_x / self.pixel_aspect
    }

    fn sy(&self) -> f64 {
        self.render_scale_y
    }

    /// Fractional pixel position of a canonical point.
    pub fn to_pixel(&self, p: Point2) -> (f64, f64) {
        (p.x * self.sx(), p.y * self.sy())
    }

    /// Nearest integer pixel of a canonical point, or `None` when the point
    /// is not finite or lies too far from the origin to address.
    pub fn to_pixel_rounded(&self, p: Point2) -> Option<(i32, i32)> {
        let (px, py) = self.to_pixel(p);
        Some((round_half_up(px)?, round_half_up(py)?))
    }

    /// Converts a pixel displacement back to canonical units.
    pub fn delta_to_canonical(&self, dx: f64, dy: f64) -> Point2 {
        Point2::new(dx / self.sx(), dy / self.sy())
    }

    /// Inclusive pixel offsets covered by a canonical offset rectangle, or
    /// `None` when a corner cannot be addressed.
    pub fn to_window(&self, rect: CanonicalRect) -> Option<PatternWindow> {
        Some(PatternWindow::new(
            round_half_up(rect.x1 * self.sx())?,
            round_half_up(rect.y1 * self.sy())?,
            round_half_up(rect.x2 * self.sx())?,
            round_half_up(rect.y2 * self.sy())?,
        ))
    }
}
