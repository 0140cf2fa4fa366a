//! Window stitching.
//!
//! Runs a [`WindowDetector`] over every planned window, segments each
//! window's probabilities, and shifts the resulting intervals into global
//! frame coordinates. Window order is preserved. Because windows overlap,
//! the same scene is usually reported once per overlapping window; pass the
//! result to [`consolidate`](crate::consolidate) to reduce it.
//!
//! # Example
//!
//! ```
//! use sceneslice::{SceneError, Window, plan_windows, stitch};
//!
//! let signal: Vec<f64> = (0..100).map(|i| if i == 20 || i == 70 { 1.0 } else { 0.0 }).collect();
//! let detector = |window: Window| -> Result<Vec<f64>, SceneError> {
//!     Ok(signal[window.start as usize..=window.end as usize].to_vec())
//! };
//!
//! let windows = plan_windows(100, 60)?;
//! let scenes = stitch(&windows, &detector, 0.5)?;
//! assert!(scenes.iter().all(|scene| scene.end < 100));
//! # Ok::<(), SceneError>(())
//! ```

use crate::{
    error::SceneError,
    interval::{Interval, Window},
    segment::segment,
};

/// Produces one boundary probability per frame of a window.
///
/// This is the seam to the external boundary-detection model. Closures of
/// the form `Fn(Window) -> Result<Vec<f64>, SceneError>` implement it
/// directly; [`FrameDetector`](crate::FrameDetector) adapts a frame source
/// plus a frame-level detector.
///
/// Implementations signal memory or device exhaustion with
/// [`SceneError::ResourceExhausted`] and any other failure with
/// [`SceneError::UpstreamFailure`].
pub trait WindowDetector {
    /// Return the probabilities for frames `window.start..=window.end`.
    fn detect(&self, window: Window) -> Result<Vec<f64>, SceneError>;
}

impl<F> WindowDetector for F
where
    F: Fn(Window) -> Result<Vec<f64>, SceneError>,
{
    fn detect(&self, window: Window) -> Result<Vec<f64>, SceneError> {
        self(window)
    }
}

/// The scenes detected inside one window, already in global coordinates.
///
/// Kept per window so callers can inspect what each detector call saw
/// before the lists are flattened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowScenes {
    /// The window that was submitted to the detector.
    pub window: Window,
    /// Scenes found in the window, offset by `window.start`.
    pub scenes: Vec<Interval>,
}

/// Detect and segment every window, keeping results grouped per window.
///
/// Stops at the first failing window; no partial results are returned.
///
/// # Errors
///
/// Returns [`SceneError::InvalidInput`] for a window whose start is past its
/// end. Propagates detector errors, and returns
/// [`SceneError::UpstreamFailure`] if the detector's output length does not
/// match the window length.
pub fn stitch_windows<D>(
    windows: &[Window],
    detector: &D,
    threshold: f64,
) -> Result<Vec<WindowScenes>, SceneError>
where
    D: WindowDetector + ?Sized,
{
    windows
        .iter()
        .map(|&window| detect_window(window, detector, threshold))
        .collect()
}

/// Detect every window and concatenate the global intervals in window order.
///
/// The output is not consolidated.
///
/// # Errors
///
/// Same as [`stitch_windows`].
pub fn stitch<D>(windows: &[Window], detector: &D, threshold: f64) -> Result<Vec<Interval>, SceneError>
where
    D: WindowDetector + ?Sized,
{
    Ok(flatten(stitch_windows(windows, detector, threshold)?))
}

/// Concatenate per-window scenes, preserving window order.
pub fn flatten(per_window: Vec<WindowScenes>) -> Vec<Interval> {
    per_window
        .into_iter()
        .flat_map(|window_scenes| window_scenes.scenes)
        .collect()
}

/// Run the detector on a single window and project its scenes to global
/// coordinates.
pub(crate) fn detect_window<D>(
    window: Window,
    detector: &D,
    threshold: f64,
) -> Result<WindowScenes, SceneError>
where
    D: WindowDetector + ?Sized,
{
    if window.start > window.end {
        return Err(SceneError::InvalidInput(format!(
            "window start ({}) is after its end ({})",
            window.start, window.end
        )));
    }

    let probabilities = detector.detect(window)?;

    if probabilities.len() as u64 != window.len() {
        return Err(SceneError::UpstreamFailure(format!(
            "detector returned {} probabilities for window {window} ({} frames)",
            probabilities.len(),
            window.len()
        )));
    }

    let scenes: Vec<Interval> = segment(&probabilities, threshold)?
        .into_iter()
        .map(|scene| scene.offset(window.start))
        .collect();

    log::debug!("Window {} produced {} scene(s)", window, scenes.len());

    Ok(WindowScenes { window, scenes })
}
