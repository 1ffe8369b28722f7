//! Rounding helpers shared by coordinate conversion and window setup.

/// Largest pixel coordinate magnitude the tracker works with.
///
/// A center plus a search offset plus a pattern offset stays well inside
/// `i32`, so window arithmetic cannot overflow.
pub(crate) const PIXEL_LIMIT: i32 = 1 << 28;

/// Rounds to the nearest integer pixel, halves rounding towards +infinity.
///
/// `2.5 -> 3`, `-2.5 -> -2`. Matches `floor(v + 0.5)` so that pixel centers
/// are stable under sign changes of the offset. Returns `None` for
/// non-finite values and for results beyond [`PIXEL_LIMIT`].
pub(crate) fn round_half_up(v: f64) -> Option<i32> {
    let r = (v + 0.5).floor();
    if r.is_finite() && r.abs() <= PIXEL_LIMIT as f64 {
        Some(r as i32)
    } else {
        None
    }
}

/// Linear interpolation between `a` and `b` at parameter `t` in `[0, 1]`.
pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}
