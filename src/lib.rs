//! # sceneslice
//!
//! Slice raw video into scene-level training clips.
//!
//! A shot-boundary detector scores every frame with the probability that it
//! ends a shot. `sceneslice` feeds arbitrarily long videos through such a
//! fixed-capacity detector and turns its signal into scene intervals:
//!
//! 1. [`plan_windows`] cuts the frame range into bounded, half-overlapping
//!    windows.
//! 2. [`segment`] turns one window's probabilities into local scenes.
//! 3. [`stitch`] runs the detector per window and shifts each window's
//!    scenes into global frame coordinates, in window order.
//! 4. [`consolidate`] reduces the overlapping result (or several index
//!    files for the same video) to a canonical, non-nested set.
//!
//! Around that core sit the pipeline stages: decoding videos into frame
//! folders, writing per-video index files in batch, and splitting frame
//! folders into one folder per scene.
//!
//! ## Quick Start
//!
//! ```
//! use sceneslice::{SceneError, Window, consolidate, plan_windows, stitch};
//!
//! // A 100-frame signal with cuts after frames 20 and 70.
//! let signal: Vec<f64> = (0..100)
//!     .map(|frame| if frame == 20 || frame == 70 { 1.0 } else { 0.0 })
//!     .collect();
//! let detector = |window: Window| -> Result<Vec<f64>, SceneError> {
//!     Ok(signal[window.start as usize..=window.end as usize].to_vec())
//! };
//!
//! let windows = plan_windows(100, 60)?;
//! let scenes = consolidate(stitch(&windows, &detector, 0.5)?)?;
//! assert_eq!(scenes.first().map(|scene| scene.start), Some(0));
//! assert_eq!(scenes.last().map(|scene| scene.end), Some(99));
//! # Ok::<(), SceneError>(())
//! ```
//!
//! ### Batch Index Generation
//!
//! ```no_run
//! use sceneslice::{Detection, HistogramDetector, SegmentationOptions, run_batch};
//!
//! let options = SegmentationOptions::new().with_window_capacity(1500);
//! let detection = Detection::Histogram(HistogramDetector::default());
//! let report = run_batch("frames", "split_idx", &detection, &options)?;
//! print!("{report}");
//! # Ok::<(), sceneslice::SceneError>(())
//! ```
//!
//! ### Optional Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `rayon` | `stitch_parallel()` runs window detection on the rayon pool |
//! | `full` | Enables all of the above |
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed to decode video files.
//! Frame folders are read with the `image` crate alone.

pub mod batch;
pub mod configuration;
pub mod consolidate;
pub mod detector;
pub mod error;
pub mod frames;
pub mod index_file;
pub mod interval;
pub mod progress;
#[cfg(feature = "rayon")]
mod rayon;
pub mod segment;
pub mod split_frames;
pub mod stitch;
pub mod window;

pub use batch::{
    BatchReport, Detection, ExtractionReport, SkipReason, SkippedVideo, VIDEO_EXTENSIONS,
    VideoEntry, VideoInput, WrittenIndex, discover_videos, extract_all_frames, open_source,
    run_batch, segment_source,
};
pub use configuration::{
    DEFAULT_THRESHOLD, DEFAULT_WINDOW_CAPACITY, DETECTOR_FRAME_HEIGHT, DETECTOR_FRAME_WIDTH,
    SegmentationOptions,
};
pub use consolidate::consolidate;
pub use detector::{BoundaryDetector, FrameDetector, HistogramDetector, PrecomputedDetector};
pub use error::SceneError;
pub use frames::{DecodedVideo, FrameFolder, FrameSource, extract_frames};
pub use index_file::{load_index, read_intervals, save_index, write_intervals};
pub use interval::{Interval, Window};
pub use progress::{CancellationToken, OperationType, ProgressCallback, ProgressInfo};
#[cfg(feature = "rayon")]
pub use crate::rayon::{stitch_parallel, stitch_windows_parallel};
pub use segment::segment;
pub use split_frames::{SplitReport, SplitVideo, count_scene_folders, split_frames};
pub use stitch::{WindowDetector, WindowScenes, flatten, stitch, stitch_windows};
pub use window::plan_windows;
