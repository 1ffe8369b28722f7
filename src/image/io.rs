//! Frame loading via the `image` crate.
//!
//! Available when the `image-io` feature is enabled. 8-bit and 16-bit gray,
//! RGB and RGBA buffers are kept at their native depth and layout; anything
//! else is converted to 8-bit RGBA.

use crate::image::{OwnedFrame, OwnedImage};
use crate::util::{PmTrackError, PmTrackResult};
use image::DynamicImage;
use std::path::Path;

/// Converts a decoded image into an owned frame without changing its depth.
pub fn frame_from_dynamic_image(img: DynamicImage) -> PmTrackResult<OwnedFrame> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    let frame: OwnedFrame = match img {
        DynamicImage::ImageLuma8(buf) => OwnedImage::new(buf.into_raw(), width, height, 1)?.into(),
        DynamicImage::ImageRgb8(buf) => OwnedImage::new(buf.into_raw(), width, height, 3)?.into(),
        DynamicImage::ImageRgba8(buf) => OwnedImage::new(buf.into_raw(), width, height, 4)?.into(),
        DynamicImage::ImageLuma16(buf) => OwnedImage::new(buf.into_raw(), width, height, 1)?.into(),
        DynamicImage::ImageRgb16(buf) => OwnedImage::new(buf.into_raw(), width, height, 3)?.into(),
        DynamicImage::ImageRgba16(buf) => {
            OwnedImage::new(buf.into_raw(), width, height, 4)?.into()
        }
        other => OwnedImage::new(other.to_rgba8().into_raw(), width, height, 4)?.into(),
    };
    Ok(frame)
}

/// Loads a frame from disk.
pub fn load_frame<P: AsRef<Path>>(path: P) -> PmTrackResult<OwnedFrame> {
    let img = image::open(path).map_err(|err| PmTrackError::ImageIo {
        reason: err.to_string(),
    })?;
    frame_from_dynamic_image(img)
}

/// Loads a frame and converts it to single-channel 8-bit, for masks.
pub fn load_mask<P: AsRef<Path>>(path: P) -> PmTrackResult<OwnedFrame> {
    let img = image::open(path).map_err(|err| PmTrackError::ImageIo {
        reason: err.to_string(),
    })?;
    let gray = img.to_luma8();
    let width = gray.width() as usize;
    let height = gray.height() as usize;
    Ok(OwnedImage::new(gray.into_raw(), width, height, 1)?.into())
}
