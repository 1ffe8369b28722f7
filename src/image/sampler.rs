//! Pixel access with an explicit out-of-bounds policy.
//!
//! Pattern and mask extraction read the reference frame strictly: a pixel
//! outside the frame does not exist and contributes zero weight. Candidate
//! scoring reads the neighbor frame with clamp-to-edge, so windows that hang
//! over the frame border stay comparable with interior windows.

use crate::image::ImageView;

/// How `sample` treats coordinates outside the image bounds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BorderPolicy {
    /// Outside the bounds there is no pixel.
    #[default]
    Strict,
    /// Coordinates are clamped to `[x1, x2 - 1] x [y1, y2 - 1]`.
    Clamp,
}

/// Returns the components of pixel `(x, y)` under `policy`.
///
/// With `BorderPolicy::Clamp` the result is always `Some`.
#[inline]
pub fn sample<'a, T>(
    image: &ImageView<'a, T>,
    x: i32,
    y: i32,
    policy: BorderPolicy,
) -> Option<&'a [T]> {
    match policy {
        BorderPolicy::Strict => image.pixel(x, y),
        BorderPolicy::Clamp => Some(image.pixel_clamped(x, y)),
    }
}
