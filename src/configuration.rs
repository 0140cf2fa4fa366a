//! Segmentation configuration.
//!
//! [`SegmentationOptions`] is a builder that carries the detection
//! threshold, window capacity, detector input size, and the operational
//! hooks (progress, cancellation) through the pipeline without widening
//! every function signature.
//!
//! # Example
//!
//! ```
//! use sceneslice::{CancellationToken, SegmentationOptions};
//!
//! let token = CancellationToken::new();
//! let options = SegmentationOptions::new()
//!     .with_threshold(0.4)
//!     .with_window_capacity(3000)
//!     .with_cancellation(token.clone());
//! assert!(options.validate().is_ok());
//! ```

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use crate::error::SceneError;
use crate::progress::{CancellationToken, NoOpProgress, ProgressCallback};

/// Default probability above which a frame counts as a boundary.
pub const DEFAULT_THRESHOLD: f64 = 0.5;
/// Default maximum number of frames per detector call.
pub const DEFAULT_WINDOW_CAPACITY: u64 = 1500;
/// Width of the frames fed to the detector.
pub const DETECTOR_FRAME_WIDTH: u32 = 48;
/// Height of the frames fed to the detector.
pub const DETECTOR_FRAME_HEIGHT: u32 = 27;

/// Settings for windowed scene segmentation.
#[derive(Clone)]
pub struct SegmentationOptions {
    pub(crate) threshold: f64,
    pub(crate) window_capacity: u64,
    pub(crate) frame_width: u32,
    pub(crate) frame_height: u32,
    /// Upper bound on decoded frame bytes per window. `None` is unbounded.
    pub(crate) max_window_bytes: Option<u64>,
    pub(crate) progress: Arc<dyn ProgressCallback>,
    pub(crate) cancellation: Option<CancellationToken>,
}

impl Debug for SegmentationOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("SegmentationOptions")
            .field("threshold", &self.threshold)
            .field("window_capacity", &self.window_capacity)
            .field("frame_width", &self.frame_width)
            .field("frame_height", &self.frame_height)
            .field("max_window_bytes", &self.max_window_bytes)
            .field("has_cancellation", &self.cancellation.is_some())
            .finish()
    }
}

impl Default for SegmentationOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl SegmentationOptions {
    /// Create options with the defaults: threshold 0.5, 1500-frame windows,
    /// 48x27 detector frames, no memory budget, no progress, no cancellation.
    pub fn new() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            window_capacity: DEFAULT_WINDOW_CAPACITY,
            frame_width: DETECTOR_FRAME_WIDTH,
            frame_height: DETECTOR_FRAME_HEIGHT,
            max_window_bytes: None,
            progress: Arc::new(NoOpProgress),
            cancellation: None,
        }
    }

    /// Set the boundary threshold. Frames with a probability strictly above
    /// it are boundaries.
    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the maximum number of frames submitted to the detector at once.
    #[must_use]
    pub fn with_window_capacity(mut self, capacity: u64) -> Self {
        self.window_capacity = capacity;
        self
    }

    /// Set the size frames are scaled to before detection.
    #[must_use]
    pub fn with_frame_size(mut self, width: u32, height: u32) -> Self {
        self.frame_width = width;
        self.frame_height = height;
        self
    }

    /// Cap the RGB bytes a single window may load. A window above the cap
    /// fails with [`SceneError::ResourceExhausted`].
    #[must_use]
    pub fn with_max_window_bytes(mut self, bytes: u64) -> Self {
        self.max_window_bytes = Some(bytes);
        self
    }

    /// Attach a progress callback, invoked once per processed video.
    #[must_use]
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }

    /// Attach a cancellation token, checked before each video.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// The boundary threshold.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// The window capacity in frames.
    pub fn window_capacity(&self) -> u64 {
        self.window_capacity
    }

    /// The detector frame size as `(width, height)`.
    pub fn frame_size(&self) -> (u32, u32) {
        (self.frame_width, self.frame_height)
    }

    /// Check the settings before any work starts.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidInput`] for a zero window capacity, a
    /// zero frame dimension, or a threshold outside `[0, 1]`.
    pub fn validate(&self) -> Result<(), SceneError> {
        if self.window_capacity == 0 {
            return Err(SceneError::InvalidInput(
                "window capacity must be greater than zero".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(SceneError::InvalidInput(format!(
                "threshold must be within [0, 1], got {}",
                self.threshold
            )));
        }
        if self.frame_width == 0 || self.frame_height == 0 {
            return Err(SceneError::InvalidInput(format!(
                "detector frame size must be non-zero, got {}x{}",
                self.frame_width, self.frame_height
            )));
        }
        Ok(())
    }

    /// Bytes one RGB8 detector frame occupies.
    pub(crate) fn frame_bytes(&self) -> u64 {
        self.frame_width as u64 * self.frame_height as u64 * 3
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(|token| token.is_cancelled())
    }
}
