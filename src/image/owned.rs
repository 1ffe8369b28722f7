//! Owned contiguous frame buffers.

use crate::image::{ImageView, PixelRect};
use crate::util::{PmTrackError, PmTrackResult};

/// Owned contiguous image with interleaved components.
#[derive(Clone, Debug)]
pub struct OwnedImage<T> {
    data: Vec<T>,
    bounds: PixelRect,
    components: usize,
}

impl<T: Copy> OwnedImage<T> {
    /// Wraps a buffer of exactly `width * height * components` samples at the origin.
    pub fn new(data: Vec<T>, width: usize, height: usize, components: usize) -> PmTrackResult<Self> {
        Self::with_bounds(data, PixelRect::from_size(width, height), components)
    }

    /// Wraps a buffer covering `bounds`.
    pub fn with_bounds(data: Vec<T>, bounds: PixelRect, components: usize) -> PmTrackResult<Self> {
        let width = bounds.width() as usize;
        let height = bounds.height() as usize;
        if width == 0 || height == 0 {
            return Err(PmTrackError::InvalidDimensions { width, height });
        }
        let needed = width
            .checked_mul(height)
            .and_then(|v| v.checked_mul(components))
            .ok_or(PmTrackError::InvalidDimensions { width, height })?;
        if data.len() < needed {
            return Err(PmTrackError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        if data.len() > needed {
            return Err(PmTrackError::InvalidDimensions { width, height });
        }
        let owned = Self {
            data,
            bounds,
            components,
        };
        // Validates the component count.
        owned.view()?;
        Ok(owned)
    }

    /// Builds an image by evaluating `f(x, y)` for every pixel, row-major.
    ///
    /// `f` returns the components of one pixel; its length must equal `components`.
    pub fn from_fn<F>(width: usize, height: usize, components: usize, mut f: F) -> PmTrackResult<Self>
    where
        F: FnMut(i32, i32) -> Vec<T>,
    {
        let mut data = Vec::with_capacity(width * height * components);
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                let px = f(x, y);
                if px.len() != components {
                    return Err(PmTrackError::InvalidComponents(px.len()));
                }
                data.extend_from_slice(&px);
            }
        }
        Self::new(data, width, height, components)
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

    pub fn components(&self) -> usize {
        self.components
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn view(&self) -> PmTrackResult<ImageView<'_, T>> {
        ImageView::new(
            &self.data,
            self.bounds,
            self.components,
            self.width() * self.components,
        )
    }
}
