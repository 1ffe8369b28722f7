//! Frame access for the tracker.

use crate::image::{FrameView, OwnedFrame, PixelRect};
use std::collections::BTreeMap;

/// Which input a frame is requested from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Clip {
    /// Frames being tracked.
    Source,
    /// Optional per-pixel pattern weights.
    Mask,
}

/// Supplies frames by clip and time.
pub trait FrameSource {
    /// Frame of `clip` at `time` covering at least `bounds_hint`, or `None`
    /// when the frame is unavailable. A missing source frame declines the
    /// step; a missing mask frame means "no mask".
    fn fetch(&self, clip: Clip, time: i64, bounds_hint: PixelRect) -> Option<FrameView<'_>>;

    /// Extent of `clip` at `time`, for callers that want to pre-clip rectangles.
    fn region_of_definition(&self, _clip: Clip, _time: i64) -> Option<PixelRect> {
        None
    }
}

/// In-memory frame source keyed by frame number.
#[derive(Clone, Debug, Default)]
pub struct FrameSequence {
    frames: BTreeMap<i64, OwnedFrame>,
    masks: BTreeMap<i64, OwnedFrame>,
}

impl FrameSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, time: i64, frame: impl Into<OwnedFrame>) -> &mut Self {
        self.frames.insert(time, frame.into());
        self
    }

    pub fn insert_mask(&mut self, time: i64, mask: impl Into<OwnedFrame>) -> &mut Self {
        self.masks.insert(time, mask.into());
        self
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// First and last frame numbers, if any frames are loaded.
    pub fn time_range(&self) -> Option<(i64, i64)> {
        let first = *self.frames.keys().next()?;
        let last = *self.frames.keys().next_back()?;
        Some((first, last))
    }

    fn clip(&self, clip: Clip) -> &BTreeMap<i64, OwnedFrame> {
        match clip {
            Clip::Source => &self.frames,
            Clip::Mask => &self.masks,
        }
    }
}

impl FrameSource for FrameSequence {
    fn fetch(&self, clip: Clip, time: i64, _bounds_hint: PixelRect) -> Option<FrameView<'_>> {
        self.clip(clip).get(&time)?.view().ok()
    }

    fn region_of_definition(&self, clip: Clip, time: i64) -> Option<PixelRect> {
        self.clip(clip).get(&time).map(OwnedFrame::bounds)
    }
}
