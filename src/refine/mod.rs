//! Sub-pixel refinement of the winning candidate.

pub(crate) mod quad1d;
pub(crate) mod quad2d;
