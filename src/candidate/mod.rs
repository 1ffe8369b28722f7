//! Best-candidate bookkeeping for window scans.

pub(crate) mod peak;
