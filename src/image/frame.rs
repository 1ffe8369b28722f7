//! Runtime-typed frames at the collaborator boundary.
//!
//! Hosts hand over frames whose depth is only known at runtime. `FrameView`
//! carries the depth as an enum tag so the tracker can check that a frame
//! pair is scoreable and then dispatch once per step to a monomorphised
//! scan over `ImageView<T>`.

use crate::image::{ImageView, OwnedImage, PixelRect, Sample};
use crate::util::PmTrackResult;
use std::fmt;

/// Sample depth of a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BitDepth {
    U8,
    U16,
    F32,
}

impl BitDepth {
    /// Maximum representable sample value.
    pub fn max_value(self) -> f64 {
        match self {
            BitDepth::U8 => <u8 as Sample>::MAX_VALUE,
            BitDepth::U16 => <u16 as Sample>::MAX_VALUE,
            BitDepth::F32 => <f32 as Sample>::MAX_VALUE,
        }
    }
}

/// Depth and component layout of a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameFormat {
    pub depth: BitDepth,
    pub components: usize,
}

impl fmt::Display for FrameFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let depth = match self.depth {
            BitDepth::U8 => "u8",
            BitDepth::U16 => "u16",
            BitDepth::F32 => "f32",
        };
        write!(f, "{depth}x{}", self.components)
    }
}

/// Borrowed frame of any supported depth.
#[derive(Clone, Copy, Debug)]
pub enum FrameView<'a> {
    U8(ImageView<'a, u8>),
    U16(ImageView<'a, u16>),
    F32(ImageView<'a, f32>),
}

impl<'a> FrameView<'a> {
    pub fn format(&self) -> FrameFormat {
        let (depth, components) = match self {
            FrameView::U8(v) => (BitDepth::U8, v.components()),
            FrameView::U16(v) => (BitDepth::U16, v.components()),
            FrameView::F32(v) => (BitDepth::F32, v.components()),
        };
        FrameFormat { depth, components }
    }

    pub fn bounds(&self) -> PixelRect {
        match self {
            FrameView::U8(v) => v.bounds(),
            FrameView::U16(v) => v.bounds(),
            FrameView::F32(v) => v.bounds(),
        }
    }

    /// Mask weight at `(x, y)`: the last component divided by the depth's
    /// maximum value, clamped to `[0, 1]` with NaN read as 0. `None` outside
    /// the bounds.
    pub fn weight_at(&self, x: i32, y: i32) -> Option<f64> {
        match self {
            FrameView::U8(v) => last_normalized(v, x, y),
            FrameView::U16(v) => last_normalized(v, x, y),
            FrameView::F32(v) => last_normalized(v, x, y),
        }
    }
}

fn last_normalized<T: Sample>(view: &ImageView<'_, T>, x: i32, y: i32) -> Option<f64> {
    let px = view.pixel(x, y)?;
    let weight = px.last()?.to_f64() / T::MAX_VALUE;
    if weight.is_nan() {
        return Some(0.0);
    }
    Some(weight.clamp(0.0, 1.0))
}

impl<'a> From<ImageView<'a, u8>> for FrameView<'a> {
    fn from(view: ImageView<'a, u8>) -> Self {
        FrameView::U8(view)
    }
}

impl<'a> From<ImageView<'a, u16>> for FrameView<'a> {
    fn from(view: ImageView<'a, u16>) -> Self {
        FrameView::U16(view)
    }
}

impl<'a> From<ImageView<'a, f32>> for FrameView<'a> {
    fn from(view: ImageView<'a, f32>) -> Self {
        FrameView::F32(view)
    }
}

/// Owned frame of any supported depth.
#[derive(Clone, Debug)]
pub enum OwnedFrame {
    U8(OwnedImage<u8>),
    U16(OwnedImage<u16>),
    F32(OwnedImage<f32>),
}

impl OwnedFrame {
    pub fn view(&self) -> PmTrackResult<FrameView<'_>> {
        Ok(match self {
            OwnedFrame::U8(img) => FrameView::U8(img.view()?),
            OwnedFrame::U16(img) => FrameView::U16(img.view()?),
            OwnedFrame::F32(img) => FrameView::F32(img.view()?),
        })
    }

    pub fn bounds(&self) -> PixelRect {
        match self {
            OwnedFrame::U8(img) => img.bounds(),
            OwnedFrame::U16(img) => img.bounds(),
            OwnedFrame::F32(img) => img.bounds(),
        }
    }
}

impl From<OwnedImage<u8>> for OwnedFrame {
    fn from(img: OwnedImage<u8>) -> Self {
        OwnedFrame::U8(img)
    }
}

impl From<OwnedImage<u16>> for OwnedFrame {
    fn from(img: OwnedImage<u16>) -> Self {
        OwnedFrame::U16(img)
    }
}

impl From<OwnedImage<f32>> for OwnedFrame {
    fn from(img: OwnedImage<f32>) -> Self {
        OwnedFrame::F32(img)
    }
}

#[cfg(test)]
mod tests {
    use super::{BitDepth, FrameView};
    use crate::image::ImageView;

    #[test]
    fn weight_reads_last_component() {
        let data: Vec<u8> = vec![0, 0, 0, 255, 9, 9, 9, 51];
        let view = ImageView::from_slice(&data, 2, 1, 4).unwrap();
        let frame = FrameView::from(view);
        assert_eq!(frame.weight_at(0, 0), Some(1.0));
        assert!((frame.weight_at(1, 0).unwrap() - 0.2).abs() < 1e-12);
        assert_eq!(frame.weight_at(2, 0), None);
        assert_eq!(frame.format().depth, BitDepth::U8);
        assert_eq!(frame.format().to_string(), "u8x4");
    }

    #[test]
    fn float_weights_are_clamped_to_unit_range() {
        let data = vec![-0.5f32, 2.0, f32::NAN, 0.25];
        let frame = FrameView::from(ImageView::from_slice(&data, 4, 1, 1).unwrap());
        assert_eq!(frame.weight_at(0, 0), Some(0.0));
        assert_eq!(frame.weight_at(1, 0), Some(1.0));
        assert_eq!(frame.weight_at(2, 0), Some(0.0));
        assert_eq!(frame.weight_at(3, 0), Some(0.25));
    }
}
