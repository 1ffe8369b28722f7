use pmtrack::lowlevel::{
    scan_window, Kernel, Ncc, Pattern, PatternWindow, Sad, ScanConfig, ScanOutcome, SearchWindow,
    Ssd, Zncc,
};
use pmtrack::{
    CanonicalRect, CancelToken, FrameSequence, ImageView, KeyframeStore, Metric, OwnedImage,
    Point2, StepOutcome, TrackState, Tracker, TrackerConfig,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const METRICS: [Metric; 4] = [Metric::Ssd, Metric::Sad, Metric::Ncc, Metric::Zncc];

/// Random texture larger than the frames so shifted copies stay fully defined.
struct Texture {
    width: usize,
    height: usize,
    components: usize,
    data: Vec<u8>,
}

impl Texture {
    fn random(width: usize, height: usize, components: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let data = (0..width * height * components)
            .map(|_| rng.random_range(16u8..=240))
            .collect();
        Self {
            width,
            height,
            components,
            data,
        }
    }

    /// `size x size` frame whose pixel `(x, y)` is texture pixel `(x + 8 - dx, y + 8 - dy)`.
    fn frame(&self, size: usize, dx: i32, dy: i32) -> OwnedImage<u8> {
        OwnedImage::from_fn(size, size, self.components, |x, y| {
            let tx = (x + 8 - dx) as usize;
            let ty = (y + 8 - dy) as usize;
            assert!(tx < self.width && ty < self.height);
            let base = (ty * self.width + tx) * self.components;
            self.data[base..base + self.components].to_vec()
        })
        .unwrap()
    }
}

fn sequential() -> Tracker {
    Tracker::new().with_config(TrackerConfig {
        parallel: false,
        ..TrackerConfig::default()
    })
}

#[test]
fn identity_match_is_the_original_position() {
    let texture = Texture::random(64, 64, 1, 7);
    let frame = texture.frame(48, 0, 0);
    let mut frames = FrameSequence::new();
    frames.insert(0, frame.clone()).insert(1, frame);

    for metric in METRICS {
        let mut state = TrackState::new(
            Point2::new(24.0, 24.0),
            CanonicalRect::square(4.0),
            CanonicalRect::square(10.0),
        )
        .with_metric(metric);
        let outcome = sequential().track_step(&mut state, &frames, 0, 1).unwrap();
        let result = outcome.match_result().copied().unwrap();
        assert_eq!(result.position, (24, 24), "{}", metric.name());
        if matches!(metric, Metric::Ssd | Metric::Sad) {
            assert_eq!(result.score, 0.0);
        }
        assert!(result.delta.0.abs() < 0.5 && result.delta.1.abs() < 0.5);
    }
}

/// 8-bit peak that is mirror-symmetric about `(cx, cy)` on both axes.
fn symmetric_peak(size: usize, cx: i32, cy: i32) -> OwnedImage<u8> {
    OwnedImage::from_fn(size, size, 1, |x, y| {
        let r2 = (x - cx).pow(2) + (y - cy).pow(2);
        vec![(200 - 6 * r2).max(20) as u8]
    })
    .unwrap()
}

#[test]
fn symmetric_match_has_no_subpixel_delta() {
    // Asymmetric texture legitimately bends the parabola; a mirror-symmetric
    // neighbourhood must not.
    for (dx, dy) in [(0, 0), (3, -2), (-4, 5)] {
        let mut frames = FrameSequence::new();
        frames
            .insert(0, symmetric_peak(48, 24, 24))
            .insert(1, symmetric_peak(48, 24 + dx, 24 + dy));

        for metric in METRICS {
            let mut state = TrackState::new(
                Point2::new(24.0, 24.0),
                CanonicalRect::square(4.0),
                CanonicalRect::square(10.0),
            )
            .with_metric(metric);
            let outcome = sequential().track_step(&mut state, &frames, 0, 1).unwrap();
            let result = outcome.match_result().copied().unwrap();
            let label = format!("{} shift ({dx}, {dy})", metric.name());
            assert_eq!(result.position, (24 + dx, 24 + dy), "{label}");
            match metric {
                Metric::Ssd | Metric::Sad => {
                    assert_eq!(result.score, 0.0, "{label}");
                    assert_eq!(result.delta, (0.0, 0.0), "{label}");
                }
                Metric::Ncc => assert_eq!(result.delta, (0.0, 0.0), "{label}"),
                // Mean subtraction leaves rounding noise in the neighbour scores.
                Metric::Zncc => {
                    assert!(result.delta.0.abs() < 1e-9, "{label}: {:?}", result.delta);
                    assert!(result.delta.1.abs() < 1e-9, "{label}: {:?}", result.delta);
                }
            }
            assert_eq!(
                state.center.keyframe_at(1).map(|k| (k.x.round(), k.y.round())),
                Some(((24 + dx) as f64, (24 + dy) as f64))
            );
        }
    }
}

#[test]
fn translation_is_recovered_by_every_metric() {
    let texture = Texture::random(72, 72, 3, 11);
    let shifts = [(3, -2), (-5, 4), (0, 6), (-7, -7)];

    for (dx, dy) in shifts {
        let mut frames = FrameSequence::new();
        frames
            .insert(0, texture.frame(48, 0, 0))
            .insert(1, texture.frame(48, dx, dy));

        for metric in METRICS {
            let mut state = TrackState::new(
                Point2::new(24.0, 24.0),
                CanonicalRect::square(4.0),
                CanonicalRect::square(12.0),
            )
            .with_metric(metric);
            let outcome = sequential().track_step(&mut state, &frames, 0, 1).unwrap();
            let result = outcome.match_result().copied().unwrap();
            assert_eq!(
                result.position,
                (24 + dx, 24 + dy),
                "{} shift ({dx}, {dy})",
                metric.name()
            );

            let key = state.center.keyframe_at(1).unwrap();
            assert!((key.x - (24 + dx) as f64).abs() < 0.5);
            assert!((key.y - (24 + dy) as f64).abs() < 0.5);
        }
    }
}

fn brute_force_min<K: Kernel>(
    image: &ImageView<'_, u8>,
    pattern: &Pattern,
    window: SearchWindow,
) -> (i32, i32, f64) {
    let mut best = (window.x0, window.y0, f64::INFINITY);
    for y in window.y0..=window.y1 {
        for x in window.x0..=window.x1 {
            let score = K::score_at(image, pattern, x, y);
            if score < best.2 {
                best = (x, y, score);
            }
        }
    }
    best
}

fn assert_scan_is_argmin<K: Kernel>(reference: &ImageView<'_, u8>, neighbor: &ImageView<'_, u8>) {
    let pattern = Pattern::extract(reference, None, PatternWindow::square(3), (20, 20)).unwrap();
    let window = SearchWindow::new(12, 12, 28, 28);
    let cfg = ScanConfig {
        parallel: false,
        band_rows: 0,
    };
    let ScanOutcome::Found(peak) =
        scan_window::<K, u8>(neighbor, &pattern, window, cfg, &CancelToken::new())
    else {
        panic!("scan returned no candidate");
    };
    let (x, y, score) = brute_force_min::<K>(neighbor, &pattern, window);
    assert_eq!((peak.x, peak.y), (x, y), "{}", K::METRIC.name());
    assert_eq!(peak.score, score);
}

#[test]
fn lower_score_is_better_for_every_metric() {
    let texture = Texture::random(64, 64, 1, 23);
    let reference = texture.frame(40, 0, 0);
    let neighbor = texture.frame(40, 2, -3);
    let reference = reference.view().unwrap();
    let neighbor = neighbor.view().unwrap();

    assert_scan_is_argmin::<Ssd>(&reference, &neighbor);
    assert_scan_is_argmin::<Sad>(&reference, &neighbor);
    assert_scan_is_argmin::<Ncc>(&reference, &neighbor);
    assert_scan_is_argmin::<Zncc>(&reference, &neighbor);
}

fn gaussian_blob(size: usize, cx: f64, cy: f64) -> OwnedImage<f32> {
    OwnedImage::from_fn(size, size, 1, |x, y| {
        let (fx, fy) = (x as f64 - cx, y as f64 - cy);
        vec![(-(fx * fx + fy * fy) / 18.0).exp() as f32]
    })
    .unwrap()
}

#[test]
fn subpixel_shift_is_refined_within_half_a_pixel() {
    let mut frames = FrameSequence::new();
    frames
        .insert(0, gaussian_blob(64, 32.0, 32.0))
        .insert(1, gaussian_blob(64, 32.3, 31.8));

    let mut state = TrackState::new(
        Point2::new(32.0, 32.0),
        CanonicalRect::square(6.0),
        CanonicalRect::square(10.0),
    );
    let outcome = sequential().track_step(&mut state, &frames, 0, 1).unwrap();
    let StepOutcome::Committed(result) = outcome else {
        panic!("step aborted: {outcome:?}");
    };
    assert_eq!(result.position, (32, 32));
    let (dx, dy) = result.delta;
    assert!(dx > 0.0 && dx < 0.5, "dx = {dx}");
    assert!(dy < 0.0 && dy > -0.5, "dy = {dy}");
    assert!((result.keyframe.x - 32.3).abs() < 0.25);
    assert!((result.keyframe.y - 31.8).abs() < 0.25);
}
