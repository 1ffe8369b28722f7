//! One tracking step between a reference frame and a neighbor frame.
//!
//! A step walks `Idle -> Extracting -> Scanning -> Refining -> Committing ->
//! Done`. Any phase between `Idle` and `Done` may end in `Aborted`, in which
//! case the neighbor keyframe is deleted so the host sees "no track here"
//! rather than a stale position.

use crate::cancel::CancelToken;
use crate::candidate::peak::Peak;
use crate::image::{FrameView, ImageView, Sample};
use crate::kernel::scalar::{Ncc, Sad, Ssd, Zncc};
use crate::kernel::{Kernel, Metric};
use crate::pattern::{ExtractError, Pattern, PatternWindow};
use crate::refine::quad2d::refine_subpixel_2d;
use crate::search::scan::scan_window;
use crate::search::{ScanOutcome, SearchWindow};
use crate::trace::{trace_event, trace_span, trace_warn};
use crate::track::geom::Point2;
use crate::track::keyframes::KeyframeStore;
use crate::track::source::{Clip, FrameSource};
use crate::track::{TrackState, TrackerConfig};
use crate::util::{PmTrackError, PmTrackResult};

/// Phase of a tracking step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepState {
    Idle,
    Extracting,
    Scanning,
    Refining,
    Committing,
    Done,
    Aborted,
}

impl StepState {
    /// Whether `self -> next` is a legal transition.
    pub fn can_advance_to(self, next: StepState) -> bool {
        use StepState::*;
        matches!(
            (self, next),
            (Idle, Extracting)
                | (Extracting, Scanning)
                | (Scanning, Refining)
                | (Refining, Committing)
                | (Committing, Done)
                | (Extracting | Scanning | Refining | Committing, Aborted)
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            StepState::Idle => "idle",
            StepState::Extracting => "extracting",
            StepState::Scanning => "scanning",
            StepState::Refining => "refining",
            StepState::Committing => "committing",
            StepState::Done => "done",
            StepState::Aborted => "aborted",
        }
    }
}

/// Why a step declined to write a neighbor keyframe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AbortReason {
    /// Pattern window is empty or lies entirely outside the reference frame.
    DegeneratePattern,
    /// Every pattern pixel has zero weight.
    ZeroWeight,
    /// The search area is smaller than the pattern.
    EmptySearchWindow,
    /// The source clip has no frame at the reference or neighbor time.
    ImageUnavailable,
    /// The best score is not finite (NCC/ZNCC with no candidate energy).
    DegenerateScore,
    /// Cancellation was requested during the scan.
    Cancelled,
}

impl AbortReason {
    pub fn name(self) -> &'static str {
        match self {
            AbortReason::DegeneratePattern => "degenerate_pattern",
            AbortReason::ZeroWeight => "zero_weight",
            AbortReason::EmptySearchWindow => "empty_search_window",
            AbortReason::ImageUnavailable => "image_unavailable",
            AbortReason::DegenerateScore => "degenerate_score",
            AbortReason::Cancelled => "cancelled",
        }
    }
}

/// Result of a committed step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatchResult {
    /// Best integer candidate center in neighbor-frame pixels.
    pub position: (i32, i32),
    /// Metric score at `position`; lower is better.
    pub score: f64,
    /// Sub-pixel correction added to `position`.
    pub delta: (f64, f64),
    /// Matched center in canonical coordinates, offset included.
    pub center: Point2,
    /// Value written at the neighbor time (`center` minus the neighbor offset).
    pub keyframe: Point2,
}

/// Outcome of one step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StepOutcome {
    Committed(MatchResult),
    Aborted(AbortReason),
}

impl StepOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, StepOutcome::Committed(_))
    }

    pub fn match_result(&self) -> Option<&MatchResult> {
        match self {
            StepOutcome::Committed(m) => Some(m),
            StepOutcome::Aborted(_) => None,
        }
    }

    pub fn abort_reason(&self) -> Option<AbortReason> {
        match self {
            StepOutcome::Committed(_) => None,
            StepOutcome::Aborted(reason) => Some(*reason),
        }
    }
}

struct StepMachine {
    state: StepState,
}

impl StepMachine {
    fn new() -> Self {
        Self {
            state: StepState::Idle,
        }
    }

    fn advance(&mut self, next: StepState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "illegal step transition {:?} -> {:?}",
            self.state,
            next
        );
        trace_event!("step_state", from = self.state.name(), to = next.name());
        self.state = next;
    }
}

/// Integer winner plus its sub-pixel correction.
struct Found {
    peak: Peak,
    delta: (f64, f64),
}

/// Per-step inputs shared by every depth/metric instantiation.
struct StepInputs<'c> {
    cfg: &'c TrackerConfig,
    cancel: &'c CancelToken,
    metric: Metric,
    pattern_window: PatternWindow,
    center_px: (i32, i32),
    window: SearchWindow,
}

pub(crate) fn track_step<S, F>(
    cfg: &TrackerConfig,
    cancel: &CancelToken,
    state: &mut TrackState<S>,
    source: &F,
    reference_time: i64,
    neighbor_time: i64,
) -> PmTrackResult<StepOutcome>
where
    S: KeyframeStore,
    F: FrameSource + ?Sized,
{
    let _span = trace_span!(
        "track_step",
        reference = reference_time,
        neighbor = neighbor_time
    )
    .entered();

    let mut machine = StepMachine::new();
    match run_step(&mut machine, cfg, cancel, state, source, reference_time, neighbor_time)? {
        Ok(result) => {
            machine.advance(StepState::Done);
            Ok(StepOutcome::Committed(result))
        }
        Err(reason) => {
            machine.advance(StepState::Aborted);
            state.center.delete_keyframe_at(neighbor_time);
            trace_warn!(
                "step_aborted",
                neighbor = neighbor_time,
                reason = reason.name()
            );
            Ok(StepOutcome::Aborted(reason))
        }
    }
}

fn run_step<S, F>(
    machine: &mut StepMachine,
    cfg: &TrackerConfig,
    cancel: &CancelToken,
    state: &mut TrackState<S>,
    source: &F,
    reference_time: i64,
    neighbor_time: i64,
) -> PmTrackResult<Result<MatchResult, AbortReason>>
where
    S: KeyframeStore,
    F: FrameSource + ?Sized,
{
    machine.advance(StepState::Extracting);

    let mapping = cfg.mapping;
    let reference_center = state.center.position_at(reference_time);
    let anchor = reference_center + state.offset.position_at(reference_time);
    let (Some(center_px), Some(pattern_window), Some(search_window)) = (
        mapping.to_pixel_rounded(anchor),
        mapping.to_window(state.pattern),
        mapping.to_window(state.search),
    ) else {
        return Ok(Err(AbortReason::DegeneratePattern));
    };

    if pattern_window.is_degenerate() {
        return Ok(Err(AbortReason::DegeneratePattern));
    }
    let Some(window) = SearchWindow::around(center_px, pattern_window, search_window) else {
        return Ok(Err(AbortReason::EmptySearchWindow));
    };

    let pattern_rect = pattern_window.placed_at(center_px.0, center_px.1);
    let search_rect = search_window.placed_at(center_px.0, center_px.1);
    let Some(reference) = source.fetch(Clip::Source, reference_time, pattern_rect) else {
        return Ok(Err(AbortReason::ImageUnavailable));
    };
    let Some(neighbor) = source.fetch(Clip::Source, neighbor_time, search_rect) else {
        return Ok(Err(AbortReason::ImageUnavailable));
    };
    let mask = source.fetch(Clip::Mask, reference_time, pattern_rect);

    let inputs = StepInputs {
        cfg,
        cancel,
        metric: state.metric,
        pattern_window,
        center_px,
        window,
    };
    let mismatch = PmTrackError::InputFormatMismatch {
        reference: reference.format(),
        neighbor: neighbor.format(),
    };
    if reference.format() != neighbor.format() {
        return Err(mismatch);
    }
    let found = match (reference, neighbor) {
        (FrameView::U8(r), FrameView::U8(n)) => {
            match_pair(machine, &inputs, &r, &n, mask.as_ref())
        }
        (FrameView::U16(r), FrameView::U16(n)) => {
            match_pair(machine, &inputs, &r, &n, mask.as_ref())
        }
        (FrameView::F32(r), FrameView::F32(n)) => {
            match_pair(machine, &inputs, &r, &n, mask.as_ref())
        }
        _ => return Err(mismatch),
    };
    let found = match found {
        Ok(found) => found,
        Err(reason) => return Ok(Err(reason)),
    };

    machine.advance(StepState::Committing);
    if !found.peak.score.is_finite() {
        return Ok(Err(AbortReason::DegenerateScore));
    }

    let (dx, dy) = found.delta;
    let shift = mapping.delta_to_canonical(
        (found.peak.x - center_px.0) as f64 + dx,
        (found.peak.y - center_px.1) as f64 + dy,
    );
    let center = anchor + shift;
    let keyframe = center - state.offset.position_at(neighbor_time);
    state.center.set_position_at(reference_time, reference_center);
    state.center.set_position_at(neighbor_time, keyframe);

    trace_event!(
        "step_commit",
        neighbor = neighbor_time,
        x = keyframe.x,
        y = keyframe.y,
        score = found.peak.score
    );
    Ok(Ok(MatchResult {
        position: (found.peak.x, found.peak.y),
        score: found.peak.score,
        delta: found.delta,
        center,
        keyframe,
    }))
}

/// Extracts the pattern and dispatches the scan for one sample depth.
fn match_pair<T: Sample>(
    machine: &mut StepMachine,
    inputs: &StepInputs<'_>,
    reference: &ImageView<'_, T>,
    neighbor: &ImageView<'_, T>,
    mask: Option<&FrameView<'_>>,
) -> Result<Found, AbortReason> {
    let pattern = Pattern::extract(reference, mask, inputs.pattern_window, inputs.center_px)
        .map_err(|err| match err {
            ExtractError::Degenerate => AbortReason::DegeneratePattern,
            ExtractError::ZeroWeight => AbortReason::ZeroWeight,
        })?;

    machine.advance(StepState::Scanning);
    match inputs.metric {
        Metric::Ssd => scan_and_refine::<Ssd, T>(machine, inputs, neighbor, &pattern),
        Metric::Sad => scan_and_refine::<Sad, T>(machine, inputs, neighbor, &pattern),
        Metric::Ncc => scan_and_refine::<Ncc, T>(machine, inputs, neighbor, &pattern),
        Metric::Zncc => scan_and_refine::<Zncc, T>(machine, inputs, neighbor, &pattern),
    }
}

fn scan_and_refine<K: Kernel, T: Sample>(
    machine: &mut StepMachine,
    inputs: &StepInputs<'_>,
    neighbor: &ImageView<'_, T>,
    pattern: &Pattern,
) -> Result<Found, AbortReason> {
    let peak = match scan_window::<K, T>(
        neighbor,
        pattern,
        inputs.window,
        inputs.cfg.scan_config(),
        inputs.cancel,
    ) {
        ScanOutcome::Found(peak) => peak,
        ScanOutcome::Empty => return Err(AbortReason::EmptySearchWindow),
        ScanOutcome::Cancelled => return Err(AbortReason::Cancelled),
    };

    machine.advance(StepState::Refining);
    let delta = if peak.score.is_finite() {
        refine_subpixel_2d(
            |x, y| K::score_at(neighbor, pattern, x, y),
            peak.x,
            peak.y,
            peak.score,
        )
    } else {
        (0.0, 0.0)
    };
    Ok(Found { peak, delta })
}
