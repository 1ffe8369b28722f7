//! Keyframed point tracking on top of the block-matching scan.
//!
//! A [`Tracker`] carries the run configuration and a cancel token; a
//! [`TrackState`] carries one track's keyframed center and offset plus its
//! pattern and search rectangles. Each step matches the pattern around the
//! reference-time center inside the neighbor frame and writes the result as
//! a keyframe at the neighbor time.

pub mod geom;
pub mod keyframes;
mod range;
pub mod source;
mod step;

pub use geom::{CanonicalRect, CoordinateMapping, Point2};
pub use keyframes::{KeyframeStore, Keyframes};
pub use range::RangeReport;
pub use source::{Clip, FrameSequence, FrameSource};
pub use step::{AbortReason, MatchResult, StepOutcome, StepState};

use crate::cancel::{CancelToken, Progress};
use crate::kernel::Metric;
use crate::search::ScanConfig;
use crate::util::PmTrackResult;

/// Direction of a range run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

impl Direction {
    /// Frame increment from reference to neighbor.
    pub fn step(self) -> i64 {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::Forward => "forward",
            Direction::Backward => "backward",
        }
    }
}

/// Per-track state read and written by the tracker.
#[derive(Clone, Debug)]
pub struct TrackState<S = Keyframes> {
    /// Track center; receives a keyframe per committed step.
    pub center: S,
    /// Added to the center to place the pattern; read only.
    pub offset: S,
    /// Pattern rectangle relative to the offset center.
    pub pattern: CanonicalRect,
    /// Search rectangle relative to the offset center.
    pub search: CanonicalRect,
    pub metric: Metric,
}

impl TrackState<Keyframes> {
    /// Track starting at `center` with a zero offset.
    pub fn new(center: Point2, pattern: CanonicalRect, search: CanonicalRect) -> Self {
        Self {
            center: Keyframes::constant(center),
            offset: Keyframes::constant(Point2::ZERO),
            pattern,
            search,
            metric: Metric::default(),
        }
    }

    pub fn with_offset(mut self, offset: Point2) -> Self {
        self.offset = Keyframes::constant(offset);
        self
    }
}

impl<S> TrackState<S> {
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }
}

/// Tracker configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackerConfig {
    /// Scan candidate rows in parallel bands (requires the `rayon` feature).
    pub parallel: bool,
    /// Rows per band; `0` splits the window evenly across worker threads.
    /// Values above the window height scan it as one band.
    pub band_rows: usize,
    /// Call [`Progress::set_time`] after each committed range step.
    pub sync_timeline: bool,
    pub mapping: CoordinateMapping,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            band_rows: 0,
            sync_timeline: false,
            mapping: CoordinateMapping::default(),
        }
    }
}

impl TrackerConfig {
    pub(crate) fn scan_config(&self) -> ScanConfig {
        ScanConfig {
            parallel: self.parallel,
            band_rows: self.band_rows,
        }
    }
}

/// Block-matching point tracker.
#[derive(Clone, Debug, Default)]
pub struct Tracker {
    cfg: TrackerConfig,
    cancel: CancelToken,
}

impl Tracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, cfg: TrackerConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Uses an externally owned token so another thread can stop the run.
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.cfg
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Tracks from `reference_time` to `neighbor_time`.
    ///
    /// On commit the reference center is pinned as a keyframe and the match
    /// is written at `neighbor_time`. On abort any keyframe at
    /// `neighbor_time` is deleted. Only mismatched input formats are errors.
    pub fn track_step<S, F>(
        &self,
        state: &mut TrackState<S>,
        source: &F,
        reference_time: i64,
        neighbor_time: i64,
    ) -> PmTrackResult<StepOutcome>
    where
        S: KeyframeStore,
        F: FrameSource + ?Sized,
    {
        step::track_step(
            &self.cfg,
            &self.cancel,
            state,
            source,
            reference_time,
            neighbor_time,
        )
    }

    /// Runs one step per frame from `first` to `last` inclusive.
    ///
    /// Each step uses the frame it starts on as reference and the next frame
    /// in `direction` as neighbor, so `|last - first| + 1` neighbor keyframes
    /// are attempted. Cancellation and a `false` from `progress` stop the run
    /// between steps; keyframes already written are kept.
    pub fn track_range<S, F, P>(
        &self,
        state: &mut TrackState<S>,
        source: &F,
        first: i64,
        last: i64,
        direction: Direction,
        progress: &mut P,
    ) -> PmTrackResult<RangeReport>
    where
        S: KeyframeStore,
        F: FrameSource + ?Sized,
        P: Progress + ?Sized,
    {
        range::track_range(self, state, source, first, last, direction, progress)
    }
}
