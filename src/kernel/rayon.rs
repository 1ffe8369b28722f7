//! Rayon-parallel window scans (feature-gated).
//!
//! The search window is cut into row bands which rayon distributes over its
//! pool. Every band reduces locally and then folds into the shared best, so
//! the mutex is taken once per band rather than once per candidate.

use crate::cancel::CancelToken;
use crate::candidate::peak::Peak;
use crate::image::{ImageView, Sample};
use crate::kernel::Kernel;
use crate::pattern::Pattern;
use crate::search::scan::{fold_into, scan_band};
use crate::search::SearchWindow;
use rayon::prelude::*;
use std::sync::Mutex;

/// Row-band parallel scan folding into `shared`.
///
/// `band_rows == 0` picks one band per pool thread; larger requests than the
/// window height collapse to a single band.
pub(crate) fn scan_bands_par<K: Kernel, T: Sample>(
    image: &ImageView<'_, T>,
    pattern: &Pattern,
    window: SearchWindow,
    band_rows: usize,
    cancel: &CancelToken,
    shared: &Mutex<Option<Peak>>,
) {
    let rows = window.rows();
    let band_rows = if band_rows == 0 {
        rows.div_ceil(rayon::current_num_threads().max(1))
    } else {
        band_rows
    }
    .min(rows)
    .max(1);

    let starts: Vec<i32> = (window.y0..=window.y1).step_by(band_rows).collect();
    starts.into_par_iter().for_each(|y_start| {
        let y_end = (y_start + band_rows as i32 - 1).min(window.y1);
        if let Some(local) = scan_band::<K, T>(image, pattern, window, y_start, y_end, cancel) {
            fold_into(shared, local);
        }
    });
}
