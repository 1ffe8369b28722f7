//! Separable sub-pixel refinement around an integer minimum.

use crate::refine::quad1d::quad_min_offset_1d;

/// Refines the integer minimum `(x, y)` with independent parabolic fits.
///
/// `score_at` is evaluated at the four axis neighbours of `(x, y)`; `best` is
/// the score already known at the center. Returns `(dx, dy)`, each in
/// `(-0.5, 0.5)` and zero on any axis where `best` is not a strict minimum.
pub fn refine_subpixel_2d<F>(mut score_at: F, x: i32, y: i32, best: f64) -> (f64, f64)
where
    F: FnMut(i32, i32) -> f64,
{
    let left = score_at(x - 1, y);
    let right = score_at(x + 1, y);
    let dx = quad_min_offset_1d(left, best, right);

    let up = score_at(x, y - 1);
    let down = score_at(x, y + 1);
    let dy = quad_min_offset_1d(up, best, down);

    (dx, dy)
}

#[cfg(test)]
mod tests {
    use super::refine_subpixel_2d;

    #[test]
    fn refines_separable_paraboloid() {
        let f = |x: i32, y: i32| {
            let (x, y) = (x as f64 - 10.0, y as f64 - 4.0);
            (x - 0.3).powi(2) + 2.0 * (y + 0.2).powi(2)
        };
        let (dx, dy) = refine_subpixel_2d(f, 10, 4, f(10, 4));
        assert!((dx - 0.3).abs() < 1e-9);
        assert!((dy + 0.2).abs() < 1e-9);
    }

    #[test]
    fn evaluates_exactly_four_neighbours() {
        let mut calls = Vec::new();
        let (dx, dy) = refine_subpixel_2d(
            |x, y| {
                calls.push((x, y));
                1.0
            },
            3,
            7,
            1.0,
        );
        assert_eq!((dx, dy), (0.0, 0.0));
        assert_eq!(calls, vec![(2, 7), (4, 7), (3, 6), (3, 8)]);
    }
}
