//! PmTrack is a CPU block-matching point tracker.
//!
//! A pattern is extracted around a tracked point in a reference frame and
//! searched for inside a window of a neighbouring frame using one of four
//! weighted metrics (SSD, SAD, NCC, ZNCC). The winner is refined to sub-pixel
//! precision and written as a keyframe; [`Tracker::track_range`] repeats this
//! frame by frame in either direction. Candidate rows are scanned in parallel
//! with the `rayon` feature (on by default).

mod cancel;
mod candidate;
pub mod image;
pub mod kernel;
pub mod lowlevel;
pub mod pattern;
mod refine;
pub mod search;
mod trace;
pub mod track;
pub mod util;

pub use cancel::{CancelToken, NoProgress, Progress};
pub use crate::image::{BitDepth, FrameFormat, FrameView, ImageView, OwnedFrame, OwnedImage, PixelRect};
pub use kernel::Metric;
pub use track::{
    AbortReason, CanonicalRect, Clip, CoordinateMapping, Direction, FrameSequence, FrameSource,
    KeyframeStore, Keyframes, MatchResult, Point2, RangeReport, StepOutcome, StepState,
    TrackState, Tracker, TrackerConfig,
};
pub use util::{PmTrackError, PmTrackResult};

#[cfg(feature = "image-io")]
pub use crate::image::io;
