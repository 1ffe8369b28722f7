use pmtrack::{
    CanonicalRect, Direction, FrameSequence, KeyframeStore, Metric, NoProgress, OwnedImage,
    PmTrackError, Point2, Progress, RangeReport, TrackState, Tracker, TrackerConfig,
};

/// Frames `0..=last` with a 5x5 bright square at `(20 + t, 32)` in frame `t`.
fn moving_square(last: i64) -> FrameSequence {
    let mut frames = FrameSequence::new();
    for t in 0..=last {
        let cx = 20 + t as i32;
        let image = OwnedImage::from_fn(64, 64, 1, |x, y| {
            let inside = (x - cx).abs() <= 2 && (y - 32).abs() <= 2;
            vec![if inside { 200u8 } else { 10 }]
        })
        .unwrap();
        frames.insert(t, image);
    }
    frames
}

fn track_from(x: f64) -> TrackState {
    TrackState::new(
        Point2::new(x, 32.0),
        CanonicalRect::square(2.0),
        CanonicalRect::square(8.0),
    )
    .with_metric(Metric::Ssd)
}

#[derive(Default)]
struct Recorder {
    fractions: Vec<f64>,
    times: Vec<i64>,
}

impl Progress for Recorder {
    fn report(&mut self, fraction: f64) -> bool {
        self.fractions.push(fraction);
        true
    }

    fn set_time(&mut self, time: i64) {
        self.times.push(time);
    }
}

fn syncing_tracker() -> Tracker {
    Tracker::new().with_config(TrackerConfig {
        sync_timeline: true,
        ..TrackerConfig::default()
    })
}

#[test]
fn forward_range_writes_one_key_per_frame() {
    let frames = moving_square(5);
    let mut state = track_from(20.0);
    let mut progress = Recorder::default();

    let report = syncing_tracker()
        .track_range(&mut state, &frames, 0, 4, Direction::Forward, &mut progress)
        .unwrap();
    assert_eq!(
        report,
        RangeReport {
            steps: 5,
            committed: 5,
            aborted: 0,
            cancelled: false,
        }
    );

    assert_eq!(state.center.times(), vec![0, 1, 2, 3, 4, 5]);
    for (t, p) in state.center.iter() {
        assert_eq!(p, Point2::new(20.0 + t as f64, 32.0));
    }
    assert_eq!(progress.times, vec![1, 2, 3, 4, 5]);
    let expected: Vec<f64> = (0..5).map(|i| (i + 1) as f64 / 5.0).collect();
    assert_eq!(progress.fractions, expected);
}

#[test]
fn backward_range_visits_decreasing_times() {
    let frames = moving_square(5);
    let mut state = track_from(25.0);
    let mut progress = Recorder::default();

    let report = syncing_tracker()
        .track_range(&mut state, &frames, 5, 1, Direction::Backward, &mut progress)
        .unwrap();
    assert_eq!(report.committed, 5);
    assert!(report.completed());

    assert_eq!(state.center.len(), 6);
    assert_eq!(progress.times, vec![4, 3, 2, 1, 0]);
    for t in 0..=5 {
        let key = state.center.keyframe_at(t).unwrap();
        assert_eq!(key, Point2::new(20.0 + t as f64, 32.0));
    }
}

#[test]
fn aborted_steps_do_not_stop_the_range() {
    let frames = moving_square(2);
    let mut state = track_from(20.0);

    let report = Tracker::new()
        .track_range(&mut state, &frames, 0, 3, Direction::Forward, &mut NoProgress)
        .unwrap();
    assert_eq!(
        report,
        RangeReport {
            steps: 4,
            committed: 2,
            aborted: 2,
            cancelled: false,
        }
    );
    assert_eq!(state.center.times(), vec![0, 1, 2]);
}

#[test]
fn progress_veto_stops_after_the_current_step() {
    let frames = moving_square(5);
    let mut state = track_from(20.0);
    let mut calls = 0;
    let mut stop_after_two = |_fraction: f64| {
        calls += 1;
        calls < 2
    };

    let report = Tracker::new()
        .track_range(&mut state, &frames, 0, 4, Direction::Forward, &mut stop_after_two)
        .unwrap();
    assert_eq!(report.steps, 2);
    assert!(report.cancelled);
    assert_eq!(state.center.times(), vec![0, 1, 2]);
}

#[test]
fn cancellation_between_steps_keeps_committed_keys() {
    let frames = moving_square(5);
    let mut state = track_from(20.0);
    let tracker = Tracker::new();
    let cancel = tracker.cancel_token().clone();
    let mut cancel_on_first = |_fraction: f64| {
        cancel.cancel();
        true
    };

    let report = tracker
        .track_range(&mut state, &frames, 0, 4, Direction::Forward, &mut cancel_on_first)
        .unwrap();
    assert_eq!(report.steps, 1);
    assert_eq!(report.committed, 1);
    assert!(report.cancelled);
    assert_eq!(state.center.times(), vec![0, 1]);
}

#[test]
fn cancelled_token_starts_no_steps() {
    let frames = moving_square(5);
    let mut state = track_from(20.0);
    let tracker = Tracker::new();
    tracker.cancel_token().cancel();

    let report = tracker
        .track_range(&mut state, &frames, 0, 4, Direction::Forward, &mut NoProgress)
        .unwrap();
    assert_eq!(report.steps, 0);
    assert!(report.cancelled);
    assert!(state.center.is_empty());
}

#[test]
fn range_must_agree_with_direction() {
    let frames = moving_square(5);
    let mut state = track_from(20.0);

    let err = Tracker::new()
        .track_range(&mut state, &frames, 4, 0, Direction::Forward, &mut NoProgress)
        .unwrap_err();
    assert_eq!(
        err,
        PmTrackError::InvalidRange {
            first: 4,
            last: 0,
            direction: "forward",
        }
    );

    let err = Tracker::new()
        .track_range(&mut state, &frames, 0, 4, Direction::Backward, &mut NoProgress)
        .unwrap_err();
    assert!(matches!(err, PmTrackError::InvalidRange { .. }));
}

#[test]
fn single_frame_range_takes_one_step() {
    let frames = moving_square(5);
    let mut state = track_from(22.0);

    let report = Tracker::new()
        .track_range(&mut state, &frames, 2, 2, Direction::Forward, &mut NoProgress)
        .unwrap();
    assert_eq!(report.steps, 1);
    assert_eq!(state.center.keyframe_at(3), Some(Point2::new(23.0, 32.0)));
}
