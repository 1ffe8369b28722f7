//! Error types for pmtrack.
//!
//! Only caller contract violations are errors. Frame pairs that simply cannot
//! be tracked are reported as [`crate::track::AbortReason`] instead.

use crate::image::FrameFormat;
use thiserror::Error;

/// Result alias for pmtrack operations.
pub type PmTrackResult<T> = std::result::Result<T, PmTrackError>;

/// Errors that can occur when building views or running the tracker.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PmTrackError {
    /// Width or height is zero or does not fit the address space.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Row stride is smaller than one row of samples.
    #[error("invalid stride {stride} for row of {row_len} samples")]
    InvalidStride { row_len: usize, stride: usize },
    /// Backing buffer is shorter than the view requires.
    #[error("buffer too small: needed {needed}, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// Pixel component count other than 1, 3 or 4.
    #[error("unsupported component count: {0}")]
    InvalidComponents(usize),
    /// Reference and neighbor frames differ in depth or component layout.
    #[error("input format mismatch: reference is {reference}, neighbor is {neighbor}")]
    InputFormatMismatch {
        reference: FrameFormat,
        neighbor: FrameFormat,
    },
    /// The requested frame range does not agree with the direction.
    #[error("invalid range {first}..={last} for {direction} tracking")]
    InvalidRange {
        first: i64,
        last: i64,
        direction: &'static str,
    },
    /// Image decoding failed (`image-io` feature).
    #[error("image io: {reason}")]
    ImageIo { reason: String },
}
