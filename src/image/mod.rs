//! Image views, frames and pixel sampling.
//!
//! `ImageView` is a borrowed 2D view into a 1D buffer of interleaved samples.
//! Unlike a plain width/height view it carries explicit pixel bounds
//! `(x1, y1, x2, y2)`, so a frame that only covers part of the canvas can be
//! addressed in canvas coordinates. The stride counts sample elements between
//! the starts of consecutive rows.

use crate::util::{PmTrackError, PmTrackResult};

mod frame;
#[cfg(feature = "image-io")]
pub mod io;
mod owned;
pub mod sampler;

pub use frame::{BitDepth, FrameFormat, FrameView, OwnedFrame};
pub use owned::OwnedImage;

/// Half-open integer pixel rectangle: `x1 <= x < x2`, `y1 <= y < y2`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PixelRect {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl PixelRect {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Rectangle anchored at the origin.
    pub fn from_size(width: usize, height: usize) -> Self {
        Self::new(0, 0, width as i32, height as i32)
    }

    pub fn width(&self) -> i32 {
        (self.x2 - self.x1).max(0)
    }

    pub fn height(&self) -> i32 {
        (self.y2 - self.y1).max(0)
    }

    pub fn is_empty(&self) -> bool {
        self.x2 <= self.x1 || self.y2 <= self.y1
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x1 && x < self.x2 && y >= self.y1 && y < self.y2
    }

    /// Intersection of two rectangles; may be empty.
    pub fn intersect(&self, other: &PixelRect) -> PixelRect {
        PixelRect {
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
            x2: self.x2.min(other.x2),
            y2: self.y2.min(other.y2),
        }
    }

    /// Smallest rectangle covering both.
    pub fn union(&self, other: &PixelRect) -> PixelRect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        PixelRect {
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
            x2: self.x2.max(other.x2),
            y2: self.y2.max(other.y2),
        }
    }
}

/// Pixel sample type with a known representable range.
pub trait Sample: Copy + Send + Sync + 'static {
    /// Maximum value of the sample range (1.0 for float data).
    const MAX_VALUE: f64;
    const DEPTH: BitDepth;

    fn to_f64(self) -> f64;
}

impl Sample for u8 {
    const MAX_VALUE: f64 = 255.0;
    const DEPTH: BitDepth = BitDepth::U8;

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl Sample for u16 {
    const MAX_VALUE: f64 = 65535.0;
    const DEPTH: BitDepth = BitDepth::U16;

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl Sample for f32 {
    const MAX_VALUE: f64 = 1.0;
    const DEPTH: BitDepth = BitDepth::F32;

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }
}

/// Borrowed view over one frame of interleaved pixels.
#[derive(Copy, Clone, Debug)]
pub struct ImageView<'a, T> {
    data: &'a [T],
    bounds: PixelRect,
    components: usize,
    stride: usize,
}

impl<'a, T> ImageView<'a, T> {
    /// Creates a contiguous view anchored at the origin.
    pub fn from_slice(
        data: &'a [T],
        width: usize,
        height: usize,
        components: usize,
    ) -> PmTrackResult<Self> {
        let stride = width
            .checked_mul(components)
            .ok_or(PmTrackError::InvalidDimensions { width, height })?;
        Self::new(data, PixelRect::from_size(width, height), components, stride)
    }

    /// Creates a view with explicit bounds and stride (in samples).
    pub fn new(
        data: &'a [T],
        bounds: PixelRect,
        components: usize,
        stride: usize,
    ) -> PmTrackResult<Self> {
        if !matches!(components, 1 | 3 | 4) {
            return Err(PmTrackError::InvalidComponents(components));
        }
        let width = bounds.width() as usize;
        let height = bounds.height() as usize;
        let needed = required_len(width, height, components, stride)?;
        if data.len() < needed {
            return Err(PmTrackError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            bounds,
            components,
            stride,
        })
    }

    pub fn bounds(&self) -> PixelRect {
        self.bounds
    }

    pub fn width(&self) -> usize {
        self.bounds.width() as usize
    }

    pub fn height(&self) -> usize {
        self.bounds.height() as usize
    }

    /// Number of interleaved components per pixel (1, 3 or 4).
    pub fn components(&self) -> usize {
        self.components
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }

    /// Returns the components of pixel `(x, y)` in canvas coordinates, or
    /// `None` outside the bounds.
    pub fn pixel(&self, x: i32, y: i32) -> Option<&'a [T]> {
        if !self.bounds.contains(x, y) {
            return None;
        }
        let start = self.offset_of(x, y);
        self.data.get(start..start + self.components)
    }

    /// Returns the pixel at the nearest in-bounds position.
    ///
    /// Bounds are non-empty by construction, so this always yields a pixel.
    #[inline]
    pub fn pixel_clamped(&self, x: i32, y: i32) -> &'a [T] {
        let cx = x.clamp(self.bounds.x1, self.bounds.x2 - 1);
        let cy = y.clamp(self.bounds.y1, self.bounds.y2 - 1);
        let start = self.offset_of(cx, cy);
        &self.data[start..start + self.components]
    }

    #[inline]
    fn offset_of(&self, x: i32, y: i32) -> usize {
        let row = (y - self.bounds.y1) as usize;
        let col = (x - self.bounds.x1) as usize;
        row * self.stride + col * self.components
    }
}

fn required_len(
    width: usize,
    height: usize,
    components: usize,
    stride: usize,
) -> PmTrackResult<usize> {
    if width == 0 || height == 0 {
        return Err(PmTrackError::InvalidDimensions { width, height });
    }
    let row_len = width
        .checked_mul(components)
        .ok_or(PmTrackError::InvalidDimensions { width, height })?;
    if stride < row_len {
        return Err(PmTrackError::InvalidStride { row_len, stride });
    }
    (height - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(row_len))
        .ok_or(PmTrackError::InvalidDimensions { width, height })
}
