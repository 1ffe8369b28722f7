//! Three-point parabolic interpolation of a score minimum.

/// Sub-pixel offset of the minimum of the parabola through
/// `(-1, prev)`, `(0, best)`, `(+1, next)`.
///
/// The fit is only meaningful when `best` is a strict local minimum; in every
/// other case, and when the curvature term is exactly zero, the offset is 0.
/// For a strict minimum the result lies in `(-0.5, 0.5)`.
pub fn quad_min_offset_1d(prev: f64, best: f64, next: f64) -> f64 {
    if !(best < prev && best < next) {
        return 0.0;
    }
    let denom = (best - next) + (best - prev);
    if denom == 0.0 {
        return 0.0;
    }
    let factor = 1.0 / denom;
    let delta = 0.5 * (next - prev) * factor;
    if delta.is_finite() {
        delta
    } else {
        0.0
    }
}
