//! Progress reporting and cancellation support.
//!
//! Batch operations walk a directory of videos one at a time. Attach a
//! [`ProgressCallback`] through
//! [`SegmentationOptions::with_progress`](crate::SegmentationOptions::with_progress)
//! to observe them, and a [`CancellationToken`] to stop between videos.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use sceneslice::{
//!     Detection, HistogramDetector, ProgressCallback, ProgressInfo, SceneError,
//!     SegmentationOptions, run_batch,
//! };
//!
//! struct PrintProgress;
//!
//! impl ProgressCallback for PrintProgress {
//!     fn on_progress(&self, info: &ProgressInfo) {
//!         if let Some(pct) = info.percentage {
//!             println!("[{:?}] {pct:.1}% complete", info.operation);
//!         }
//!     }
//! }
//!
//! let options = SegmentationOptions::new().with_progress(Arc::new(PrintProgress));
//! let detection = Detection::Histogram(HistogramDetector::default());
//! let report = run_batch("frames", "split_idx", &detection, &options)?;
//! # Ok::<(), SceneError>(())
//! ```

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::time::{Duration, Instant};

/// The kind of batch operation currently in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum OperationType {
    /// Decoding videos into frame folders.
    FrameExtraction,
    /// Running the boundary detector and writing index files.
    BoundaryDetection,
    /// Linking frames into per-scene folders.
    FrameSplitting,
}

/// A snapshot of batch progress.
#[derive(Debug, Clone)]
pub struct ProgressInfo {
    /// What kind of work is being performed.
    pub operation: OperationType,
    /// How many items (videos) have been processed so far.
    pub current: u64,
    /// Total items expected, if known ahead of time.
    pub total: Option<u64>,
    /// Completion percentage (0.0 to 100.0), if `total` is known.
    pub percentage: Option<f32>,
    /// Wall-clock time elapsed since the operation started.
    pub elapsed: Duration,
    /// Estimated time remaining, based on current throughput.
    pub estimated_remaining: Option<Duration>,
    /// Name of the item that was just finished.
    pub current_item: Option<String>,
}

/// Trait for receiving progress updates during batch operations.
///
/// Progress callbacks are infallible: they observe but cannot halt the
/// operation. Use [`CancellationToken`] for cooperative cancellation.
pub trait ProgressCallback: Send + Sync {
    /// Called after each processed item.
    fn on_progress(&self, info: &ProgressInfo);
}

/// Discards all progress notifications. The default callback.
pub(crate) struct NoOpProgress;

impl ProgressCallback for NoOpProgress {
    fn on_progress(&self, _info: &ProgressInfo) {}
}

/// Cooperative cancellation token backed by an [`AtomicBool`].
///
/// Clones share state. Batch loops check the token before each video and
/// return [`SceneError::Cancelled`](crate::SceneError::Cancelled) once it is
/// set.
///
/// ```
/// use sceneslice::CancellationToken;
///
/// let token = CancellationToken::new();
/// let clone = token.clone();
/// token.cancel();
/// assert!(clone.is_cancelled());
/// ```
#[derive(Debug, Clone)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a new, non-cancelled token.
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Request cancellation. All clones observe it.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Check whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Tracks timing for one batch operation and emits callbacks.
pub(crate) struct ProgressTracker {
    callback: Arc<dyn ProgressCallback>,
    operation: OperationType,
    total: Option<u64>,
    current: u64,
    start_time: Instant,
}

impl ProgressTracker {
    pub(crate) fn new(
        callback: Arc<dyn ProgressCallback>,
        operation: OperationType,
        total: Option<u64>,
    ) -> Self {
        Self {
            callback,
            operation,
            total,
            current: 0,
            start_time: Instant::now(),
        }
    }

    /// Record one finished item and notify the callback.
    pub(crate) fn advance(&mut self, item: &str) {
        self.current += 1;

        let elapsed = self.start_time.elapsed();
        let percentage = self
            .total
            .filter(|&total| total > 0)
            .map(|total| (self.current as f32 / total as f32) * 100.0);
        let estimated_remaining = self.total.map(|total| {
            let remaining = total.saturating_sub(self.current);
            let per_item = elapsed / self.current as u32;
            per_item * remaining as u32
        });

        self.callback.on_progress(&ProgressInfo {
            operation: self.operation,
            current: self.current,
            total: self.total,
            percentage,
            elapsed,
            estimated_remaining,
            current_item: Some(item.to_string()),
        });
    }
}
