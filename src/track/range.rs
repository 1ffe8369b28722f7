//! Tracking over a span of frames.

use crate::cancel::Progress;
use crate::trace::{trace_event, trace_span};
use crate::track::keyframes::KeyframeStore;
use crate::track::source::FrameSource;
use crate::track::step::{AbortReason, StepOutcome};
use crate::track::{Direction, TrackState, Tracker};
use crate::util::{PmTrackError, PmTrackResult};

/// Summary of a range run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RangeReport {
    /// Steps attempted.
    pub steps: usize,
    /// Steps that wrote a neighbor keyframe.
    pub committed: usize,
    /// Steps that declined, cancelled ones included.
    pub aborted: usize,
    /// Whether the run stopped early on a cancel request or a progress veto.
    pub cancelled: bool,
}

impl RangeReport {
    pub fn completed(&self) -> bool {
        !self.cancelled
    }
}

pub(crate) fn track_range<S, F, P>(
    tracker: &Tracker,
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
    let ordered = match direction {
        Direction::Forward => first <= last,
        Direction::Backward => first >= last,
    };
    if !ordered {
        return Err(PmTrackError::InvalidRange {
            first,
            last,
            direction: direction.name(),
        });
    }

    let _span = trace_span!(
        "track_range",
        first = first,
        last = last,
        direction = direction.name()
    )
    .entered();

    let step = direction.step();
    let count = first.abs_diff(last) as usize + 1;
    let cancel = tracker.cancel_token();
    let mut report = RangeReport::default();
    let mut time = first;

    for index in 0..count {
        if cancel.is_cancelled() {
            report.cancelled = true;
            break;
        }

        let outcome = tracker.track_step(state, source, time, time + step)?;
        report.steps += 1;
        match outcome {
            StepOutcome::Committed(_) => {
                report.committed += 1;
                if tracker.config().sync_timeline {
                    progress.set_time(time + step);
                }
            }
            StepOutcome::Aborted(AbortReason::Cancelled) => {
                report.aborted += 1;
                report.cancelled = true;
                break;
            }
            StepOutcome::Aborted(_) => report.aborted += 1,
        }

        if !progress.report((index + 1) as f64 / count as f64) {
            report.cancelled = true;
            break;
        }
        time += step;
    }

    trace_event!(
        "range_done",
        steps = report.steps,
        committed = report.committed,
        aborted = report.aborted,
        cancelled = report.cancelled
    );
    Ok(report)
}
