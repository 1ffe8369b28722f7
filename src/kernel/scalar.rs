//! Scalar reference kernels for the four metrics.

use crate::image::{ImageView, Sample};
use crate::kernel::{Kernel, Metric};
use crate::pattern::{Pattern, MAX_SCORED_COMPONENTS};

/// Weighted SSD: `sum(w^2 * (ref - other)^2)`.
pub struct Ssd;

/// Weighted SAD: `sum(w * |ref - other|)`.
pub struct Sad;

/// Energy-normalised cross-correlation: `-sum(w * ref * other) / sqrt(sum(w * other^2))`.
pub struct Ncc;

/// Zero-mean cross-correlation, normalised like `Ncc`.
pub struct Zncc;

/// Visits every weighted pattern cell together with the clamped candidate pixel.
///
/// Cells with zero weight contribute nothing to any metric and are skipped.
#[inline(always)]
fn for_each_cell<T, F>(image: &ImageView<'_, T>, pattern: &Pattern, cx: i32, cy: i32, mut f: F)
where
    T: Sample,
    F: FnMut(f64, &[f64], &[T]),
{
    let window = pattern.window();
    let comps = pattern.components();
    let samples = pattern.samples();
    let weights = pattern.weights();

    let mut idx = 0usize;
    for i in window.y1..=window.y2 {
        for j in window.x1..=window.x2 {
            let w = weights[idx];
            if w != 0.0 {
                let base = idx * comps;
                let other = image.pixel_clamped(cx + j, cy + i);
                f(w, &samples[base..base + comps], other);
            }
            idx += 1;
        }
    }
}

impl Kernel for Ssd {
    const METRIC: Metric = Metric::Ssd;

    fn score_at<T: Sample>(image: &ImageView<'_, T>, pattern: &Pattern, cx: i32, cy: i32) -> f64 {
        let mut score = 0.0f64;
        for_each_cell(image, pattern, cx, cy, |w, reference, other| {
            let w2 = w * w;
            for (&r, &o) in reference.iter().zip(other) {
                let diff = r - o.to_f64();
                score += w2 * diff * diff;
            }
        });
        score
    }
}

impl Kernel for Sad {
    const METRIC: Metric = Metric::Sad;

    fn score_at<T: Sample>(image: &ImageView<'_, T>, pattern: &Pattern, cx: i32, cy: i32) -> f64 {
        let mut score = 0.0f64;
        for_each_cell(image, pattern, cx, cy, |w, reference, other| {
            for (&r, &o) in reference.iter().zip(other) {
                score += w * (r - o.to_f64()).abs();
            }
        });
        score
    }
}

impl Kernel for Ncc {
    const METRIC: Metric = Metric::Ncc;

    fn score_at<T: Sample>(image: &ImageView<'_, T>, pattern: &Pattern, cx: i32, cy: i32) -> f64 {
        let mut score = 0.0f64;
        let mut other_ssq = 0.0f64;
        for_each_cell(image, pattern, cx, cy, |w, reference, other| {
            for (&r, &o) in reference.iter().zip(other) {
                let o = o.to_f64();
                score -= w * r * o;
                other_ssq += w * o * o;
            }
        });
        normalise(score, other_ssq)
    }
}

impl Kernel for Zncc {
    const METRIC: Metric = Metric::Zncc;

    fn score_at<T: Sample>(image: &ImageView<'_, T>, pattern: &Pattern, cx: i32, cy: i32) -> f64 {
        let comps = pattern.components();
        let ref_mean = pattern.mean();

        let mut sum = [0.0f64; MAX_SCORED_COMPONENTS];
        for_each_cell(image, pattern, cx, cy, |w, _reference, other| {
            for (acc, &o) in sum.iter_mut().zip(other).take(comps) {
                *acc += w * o.to_f64();
            }
        });
        let weight_total = pattern.weight_total();
        let mut other_mean = [0.0f64; MAX_SCORED_COMPONENTS];
        for (mean, acc) in other_mean.iter_mut().zip(sum.iter()).take(comps) {
            *mean = acc / weight_total;
        }

        let mut score = 0.0f64;
        let mut other_ssq = 0.0f64;
        for_each_cell(image, pattern, cx, cy, |w, reference, other| {
            for c in 0..reference.len().min(other.len()) {
                let r = reference[c] - ref_mean[c];
                let o = other[c].to_f64() - other_mean[c];
                score -= w * r * o;
                other_ssq += w * o * o;
            }
        });
        normalise(score, other_ssq)
    }
}

/// A candidate with no weighted energy cannot be compared and scores `+inf`.
#[inline]
fn normalise(score: f64, other_ssq: f64) -> f64 {
    if other_ssq != 0.0 {
        score / other_ssq.sqrt()
    } else {
        f64::INFINITY
    }
}

#[cfg(test)]
mod tests {
    use super::{Ncc, Sad, Ssd, Zncc};
    use crate::image::{FrameView, ImageView};
    use crate::kernel::Kernel;
    use crate::pattern::{Pattern, PatternWindow};

    fn checker(width: usize, height: usize) -> Vec<u8> {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(((x * 37 + y * 91 + x * y * 7) % 256) as u8);
            }
        }
        data
    }

    #[test]
    fn ssd_squares_the_weight() {
        let reference = vec![100u8];
        let other = vec![90u8];
        let mask = vec![128u8];
        let ref_view = ImageView::from_slice(&reference, 1, 1, 1).unwrap();
        let other_view = ImageView::from_slice(&other, 1, 1, 1).unwrap();
        let mask_frame = FrameView::from(ImageView::from_slice(&mask, 1, 1, 1).unwrap());
        let pattern =
            Pattern::extract(&ref_view, Some(&mask_frame), PatternWindow::square(0), (0, 0))
                .unwrap();
        let w = 128.0 / 255.0;

        let ssd = Ssd::score_at(&other_view, &pattern, 0, 0);
        assert!((ssd - w * w * 100.0).abs() < 1e-9);
        let sad = Sad::score_at(&other_view, &pattern, 0, 0);
        assert!((sad - w * 10.0).abs() < 1e-9);
    }

    #[test]
    fn identical_window_scores_are_optimal() {
        let data = checker(16, 16);
        let view = ImageView::from_slice(&data, 16, 16, 1).unwrap();
        let pattern = Pattern::extract(&view, None, PatternWindow::square(2), (8, 8)).unwrap();

        assert_eq!(Ssd::score_at(&view, &pattern, 8, 8), 0.0);
        assert_eq!(Sad::score_at(&view, &pattern, 8, 8), 0.0);

        let energy: f64 = pattern.samples().iter().map(|v| v * v).sum();
        let ncc = Ncc::score_at(&view, &pattern, 8, 8);
        assert!((ncc + energy.sqrt()).abs() < 1e-9);

        let zncc_self = Zncc::score_at(&view, &pattern, 8, 8);
        for (cx, cy) in [(7, 8), (9, 8), (8, 7), (8, 9)] {
            assert!(zncc_self <= Zncc::score_at(&view, &pattern, cx, cy));
            assert!(ncc <= Ncc::score_at(&view, &pattern, cx, cy));
        }
    }

    #[test]
    fn zero_energy_window_scores_infinity() {
        let reference = checker(5, 5);
        let ref_view = ImageView::from_slice(&reference, 5, 5, 1).unwrap();
        let pattern = Pattern::extract(&ref_view, None, PatternWindow::square(1), (2, 2)).unwrap();

        let black = vec![0u8; 25];
        let black_view = ImageView::from_slice(&black, 5, 5, 1).unwrap();
        assert_eq!(Ncc::score_at(&black_view, &pattern, 2, 2), f64::INFINITY);

        let flat = vec![77u8; 25];
        let flat_view = ImageView::from_slice(&flat, 5, 5, 1).unwrap();
        assert_eq!(Zncc::score_at(&flat_view, &pattern, 2, 2), f64::INFINITY);
    }

    #[test]
    fn alpha_component_is_ignored() {
        let reference: Vec<u8> = vec![10, 20, 30, 0];
        let other: Vec<u8> = vec![10, 20, 30, 255];
        let ref_view = ImageView::from_slice(&reference, 1, 1, 4).unwrap();
        let other_view = ImageView::from_slice(&other, 1, 1, 4).unwrap();
        let pattern = Pattern::extract(&ref_view, None, PatternWindow::square(0), (0, 0)).unwrap();
        assert_eq!(Ssd::score_at(&other_view, &pattern, 0, 0), 0.0);
        assert_eq!(Sad::score_at(&other_view, &pattern, 0, 0), 0.0);
    }
}
