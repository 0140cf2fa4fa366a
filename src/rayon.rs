//! Parallel window detection.
//!
//! Windows are independent: each detector call reads its own frames and
//! shares no mutable state with the others. [`stitch_parallel`] spreads the
//! calls over the rayon thread pool and hands back results in window order,
//! exactly as [`stitch`](crate::stitch) would.

use ::rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use crate::error::SceneError;
use crate::interval::{Interval, Window};
use crate::stitch::{WindowDetector, WindowScenes, detect_window, flatten};

/// Parallel counterpart of [`stitch_windows`](crate::stitch_windows).
///
/// The pool size follows rayon's global configuration
/// (`RAYON_NUM_THREADS`). If several windows fail, which error is returned
/// is unspecified.
pub fn stitch_windows_parallel<D>(
    windows: &[Window],
    detector: &D,
    threshold: f64,
) -> Result<Vec<WindowScenes>, SceneError>
where
    D: WindowDetector + Sync + ?Sized,
{
    // Indexed collect keeps window order.
    windows
        .par_iter()
        .map(|&window| detect_window(window, detector, threshold))
        .collect()
}

/// Parallel counterpart of [`stitch`](crate::stitch).
pub fn stitch_parallel<D>(
    windows: &[Window],
    detector: &D,
    threshold: f64,
) -> Result<Vec<Interval>, SceneError>
where
    D: WindowDetector + Sync + ?Sized,
{
    Ok(flatten(stitch_windows_parallel(windows, detector, threshold)?))
}
