//! Dense scan over a search window with a single shared best.

use crate::cancel::CancelToken;
use crate::candidate::peak::{peak_cmp_asc, BestPeak, Peak};
use crate::image::{ImageView, Sample};
use crate::kernel::Kernel;
use crate::pattern::Pattern;
use crate::search::{ScanConfig, ScanOutcome, SearchWindow};
use crate::trace::{trace_event, trace_span};
use std::cmp::Ordering;
use std::sync::{Mutex, PoisonError};

/// Scans every candidate center of `window` and returns the best one.
///
/// Bands do not synchronise while scanning. Each band folds its local best
/// into a mutex-guarded shared value once, replacing it only when strictly
/// better. Cancellation is polled once per row; a cancelled band folds
/// nothing and the whole scan reports `Cancelled`.
pub fn scan_window<K: Kernel, T: Sample>(
    image: &ImageView<'_, T>,
    pattern: &Pattern,
    window: SearchWindow,
    cfg: ScanConfig,
    cancel: &CancelToken,
) -> ScanOutcome {
    let _span = trace_span!(
        "scan_window",
        metric = K::METRIC.name(),
        rows = window.rows(),
        cols = window.cols()
    )
    .entered();

    if window.is_empty() {
        return ScanOutcome::Empty;
    }

    let shared = Mutex::new(None);
    run_bands::<K, T>(image, pattern, window, cfg, cancel, &shared);

    if cancel.is_cancelled() {
        return ScanOutcome::Cancelled;
    }
    match shared.into_inner().unwrap_or_else(PoisonError::into_inner) {
        Some(best) => {
            trace_event!("scan_best", x = best.x, y = best.y, score = best.score);
            ScanOutcome::Found(best)
        }
        None => ScanOutcome::Empty,
    }
}

fn run_bands<K: Kernel, T: Sample>(
    image: &ImageView<'_, T>,
    pattern: &Pattern,
    window: SearchWindow,
    cfg: ScanConfig,
    cancel: &CancelToken,
    shared: &Mutex<Option<Peak>>,
) {
    #[cfg(feature = "rayon")]
    {
        if cfg.parallel {
            crate::kernel::rayon::scan_bands_par::<K, T>(
                image,
                pattern,
                window,
                cfg.band_rows,
                cancel,
                shared,
            );
            return;
        }
    }

    let _ = cfg;
    if let Some(local) = scan_band::<K, T>(image, pattern, window, window.y0, window.y1, cancel) {
        fold_into(shared, local);
    }
}

/// Scans rows `y_start..=y_end` of `window` and returns the band's best.
///
/// Returns `None` if cancelled before the band completed.
pub(crate) fn scan_band<K: Kernel, T: Sample>(
    image: &ImageView<'_, T>,
    pattern: &Pattern,
    window: SearchWindow,
    y_start: i32,
    y_end: i32,
    cancel: &CancelToken,
) -> Option<Peak> {
    let mut best = BestPeak::new();
    for y in y_start..=y_end {
        if cancel.is_cancelled() {
            return None;
        }
        for x in window.x0..=window.x1 {
            let score = K::score_at(image, pattern, x, y);
            best.offer(Peak { x, y, score });
        }
    }
    best.get()
}

/// Replaces the shared best with `local` if `local` is strictly better.
pub(crate) fn fold_into(shared: &Mutex<Option<Peak>>, local: Peak) {
    let mut guard = shared.lock().unwrap_or_else(PoisonError::into_inner);
    match *guard {
        Some(current) if peak_cmp_asc(&local, &current) != Ordering::Less => {}
        _ => *guard = Some(local),
    }
}
