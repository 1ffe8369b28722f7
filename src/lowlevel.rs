//! Low-level building blocks for custom tracking pipelines.
//!
//! These expose pattern extraction, the metric kernels, the window scan and
//! sub-pixel refinement for callers that drive matching themselves instead
//! of going through [`Tracker`](crate::Tracker).

pub use crate::candidate::peak::Peak;
pub use crate::image::sampler::{sample, BorderPolicy};
pub use crate::image::Sample;
pub use crate::kernel::scalar::{Ncc, Sad, Ssd, Zncc};
pub use crate::kernel::Kernel;
pub use crate::pattern::{ExtractError, Pattern, PatternWindow};
pub use crate::refine::quad1d::quad_min_offset_1d;
pub use crate::refine::quad2d::refine_subpixel_2d;
pub use crate::search::scan::scan_window;
pub use crate::search::{ScanConfig, ScanOutcome, SearchWindow};
