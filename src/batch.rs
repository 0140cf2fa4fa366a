//! Directory-level pipeline stages.
//!
//! [`run_batch`] walks a directory of videos (frame folders or video files),
//! runs windowed detection on each, and writes one index file per video.
//! A video whose frame folder is empty, whose frames cannot be read or
//! decoded, or whose detector runs out of resources, is skipped and recorded
//! in the [`BatchReport`]; invalid input and detector failures stop the
//! batch. Skipped videos get no index file, not even a partial one.
//!
//! [`extract_all_frames`] is the stage before it: decode every video file in
//! a directory into a frame folder.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    fs,
    path::{Path, PathBuf},
};

use serde_json::{Value, json};

use crate::{
    configuration::SegmentationOptions,
    detector::{FrameDetector, HistogramDetector, PrecomputedDetector},
    error::SceneError,
    frames::{DecodedVideo, FrameFolder, FrameSource, extract_frames, has_extension},
    index_file::save_index,
    interval::{Interval, Window},
    progress::{OperationType, ProgressTracker},
    stitch::WindowDetector,
    window::plan_windows,
};

/// File extensions treated as video files.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mkv", "mov", "avi", "webm"];

/// Where a video's frames come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoInput {
    /// A directory of extracted frame images.
    FrameFolder(PathBuf),
    /// A video file decoded with FFmpeg.
    VideoFile(PathBuf),
}

/// One video found in an input directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoEntry {
    /// Folder name, or file stem for video files. Names the index file.
    pub name: String,
    /// Frame location.
    pub input: VideoInput,
}

/// Find the videos in `directory`, sorted by name.
///
/// Sub-directories are frame folders; files with a [`VIDEO_EXTENSIONS`]
/// extension are video files. Anything else is ignored.
pub fn discover_videos<P: AsRef<Path>>(directory: P) -> Result<Vec<VideoEntry>, SceneError> {
    let directory = directory.as_ref();
    if !directory.is_dir() {
        return Err(SceneError::InvalidInput(format!(
            "input folder {} does not exist",
            directory.display()
        )));
    }

    let mut entries = Vec::new();
    for dir_entry in fs::read_dir(directory)? {
        let path = dir_entry?.path();
        let input = if path.is_dir() {
            VideoInput::FrameFolder(path.clone())
        } else if has_extension(&path, VIDEO_EXTENSIONS) {
            VideoInput::VideoFile(path.clone())
        } else {
            continue;
        };

        let name_source = match &input {
            VideoInput::FrameFolder(_) => path.file_name(),
            VideoInput::VideoFile(_) => path.file_stem(),
        };
        let Some(name) = name_source.map(|name| name.to_string_lossy().into_owned()) else {
            continue;
        };

        entries.push(VideoEntry { name, input });
    }

    entries.sort_by(|left, right| left.name.cmp(&right.name));
    Ok(entries)
}

/// Which detector produces the boundary probabilities.
#[derive(Debug, Clone)]
pub enum Detection {
    /// The built-in histogram-difference detector.
    Histogram(HistogramDetector),
    /// Probabilities from an earlier model run, read from
    /// `<directory>/<video name>.txt`.
    Precomputed {
        /// Directory holding one probability file per video.
        directory: PathBuf,
    },
}

/// Open the frame source for `entry` at the options' detector size.
pub fn open_source(
    entry: &VideoEntry,
    options: &SegmentationOptions,
) -> Result<Box<dyn FrameSource + Sync>, SceneError> {
    let (width, height) = options.frame_size();
    Ok(match &entry.input {
        VideoInput::FrameFolder(path) => Box::new(FrameFolder::open(path, width, height)?),
        VideoInput::VideoFile(path) => Box::new(DecodedVideo::open(path, width, height)?),
    })
}

/// Plan windows over `source`, detect, and return the stitched global
/// intervals. The result is not consolidated.
///
/// # Errors
///
/// - [`SceneError::InvalidInput`] for invalid options or an empty source.
/// - [`SceneError::ResourceExhausted`] if a window exceeds the memory budget.
/// - [`SceneError::UpstreamFailure`] if the detector output is malformed,
///   including a precomputed signal whose length differs from the source.
pub fn segment_source<S>(
    source: &S,
    name: &str,
    detection: &Detection,
    options: &SegmentationOptions,
) -> Result<Vec<Interval>, SceneError>
where
    S: FrameSource + Sync + ?Sized,
{
    options.validate()?;
    let windows = plan_windows(source.frame_count(), options.window_capacity())?;

    match detection {
        Detection::Histogram(detector) => {
            let detector = FrameDetector::new(source, detector, options);
            run_stitch(&windows, &detector, options.threshold())
        }
        Detection::Precomputed { directory } => {
            let detector = PrecomputedDetector::load(directory.join(format!("{name}.txt")))?;
            if detector.frame_count() != source.frame_count() {
                return Err(SceneError::UpstreamFailure(format!(
                    "{name}: precomputed signal covers {} frame(s) but the video has {}",
                    detector.frame_count(),
                    source.frame_count()
                )));
            }
            run_stitch(&windows, &detector, options.threshold())
        }
    }
}

#[cfg(feature = "rayon")]
fn run_stitch<D>(windows: &[Window], detector: &D, threshold: f64) -> Result<Vec<Interval>, SceneError>
where
    D: WindowDetector + Sync + ?Sized,
{
    crate::rayon::stitch_parallel(windows, detector, threshold)
}

#[cfg(not(feature = "rayon"))]
fn run_stitch<D>(windows: &[Window], detector: &D, threshold: f64) -> Result<Vec<Interval>, SceneError>
where
    D: WindowDetector + Sync + ?Sized,
{
    crate::stitch::stitch(windows, detector, threshold)
}

/// Why a video produced no index file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The frame folder or video had no frames.
    EmptyInput,
    /// The detector ran out of resources.
    ResourceExhausted(String),
    /// The video or one of its frames could not be opened or decoded.
    Unreadable(String),
}

impl SkipReason {
    /// Classify a per-video error; errors that must stop the batch come back
    /// unchanged.
    fn from_error(error: SceneError) -> Result<Self, SceneError> {
        match error {
            SceneError::ResourceExhausted(message) => Ok(SkipReason::ResourceExhausted(message)),
            error @ (SceneError::FileOpen { .. }
            | SceneError::NoVideoStream
            | SceneError::VideoDecodeError(_)
            | SceneError::FfmpegError(_)
            | SceneError::ImageError(_)) => Ok(SkipReason::Unreadable(error.to_string())),
            other => Err(other),
        }
    }
}

impl Display for SkipReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            SkipReason::EmptyInput => write!(f, "no frames"),
            SkipReason::ResourceExhausted(message) => write!(f, "resource exhausted: {message}"),
            SkipReason::Unreadable(message) => write!(f, "unreadable: {message}"),
        }
    }
}

/// A video the batch skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedVideo {
    /// Video name.
    pub name: String,
    /// Why it was skipped.
    pub reason: SkipReason,
}

/// An index file the batch wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenIndex {
    /// Video name.
    pub name: String,
    /// Path of the index file.
    pub path: PathBuf,
    /// Number of (unconsolidated) intervals written.
    pub interval_count: usize,
}

/// Outcome of [`run_batch`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Index files written, in processing order.
    pub written: Vec<WrittenIndex>,
    /// Videos skipped, in processing order.
    pub skipped: Vec<SkippedVideo>,
}

impl BatchReport {
    /// Returns `true` if every video produced an index file.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }

    /// Machine-readable form of the report.
    pub fn to_json(&self) -> Value {
        json!({
            "written": self.written.iter().map(|index| json!({
                "name": index.name,
                "path": index.path.display().to_string(),
                "intervals": index.interval_count,
            })).collect::<Vec<_>>(),
            "skipped": self.skipped.iter().map(|video| json!({
                "name": video.name,
                "reason": video.reason.to_string(),
            })).collect::<Vec<_>>(),
        })
    }
}

impl Display for BatchReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        writeln!(f, "Wrote {} index file(s)", self.written.len())?;
        if !self.skipped.is_empty() {
            writeln!(f, "Skipped {} video(s):", self.skipped.len())?;
            for video in &self.skipped {
                writeln!(f, "  {}: {}", video.name, video.reason)?;
            }
        }
        Ok(())
    }
}

/// Run detection over every video in `input_directory` and write
/// `<output_directory>/<name>.txt` for each.
///
/// # Errors
///
/// Returns the first error that does not describe a single unusable video:
/// invalid input, detector failures and I/O errors stop the batch, as does
/// [`SceneError::Cancelled`] once the options' cancellation token is set
/// between videos.
pub fn run_batch<P, Q>(
    input_directory: P,
    output_directory: Q,
    detection: &Detection,
    options: &SegmentationOptions,
) -> Result<BatchReport, SceneError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    options.validate()?;
    let entries = discover_videos(input_directory)?;
    let output_directory = output_directory.as_ref();
    fs::create_dir_all(output_directory)?;

    let mut tracker = ProgressTracker::new(
        options.progress.clone(),
        OperationType::BoundaryDetection,
        Some(entries.len() as u64),
    );
    let mut report = BatchReport::default();

    for entry in &entries {
        if options.is_cancelled() {
            return Err(SceneError::Cancelled);
        }

        log::debug!("Processing {}", entry.name);

        let result = open_source(entry, options).and_then(|source| {
            if source.frame_count() == 0 {
                return Ok(None);
            }
            segment_source(source.as_ref(), &entry.name, detection, options).map(Some)
        });

        match result {
            Ok(Some(intervals)) => {
                let path = output_directory.join(format!("{}.txt", entry.name));
                save_index(&path, &intervals)?;
                log::info!("{}: wrote {} interval(s)", entry.name, intervals.len());
                report.written.push(WrittenIndex {
                    name: entry.name.clone(),
                    path,
                    interval_count: intervals.len(),
                });
            }
            Ok(None) => {
                log::warn!("Skipping {}: no frames", entry.name);
                report.skipped.push(SkippedVideo {
                    name: entry.name.clone(),
                    reason: SkipReason::EmptyInput,
                });
            }
            Err(error) => {
                let reason = SkipReason::from_error(error)?;
                log::warn!("Skipping {}: {reason}", entry.name);
                report.skipped.push(SkippedVideo {
                    name: entry.name.clone(),
                    reason,
                });
            }
        }

        tracker.advance(&entry.name);
    }

    Ok(report)
}

/// Outcome of [`extract_all_frames`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionReport {
    /// `(video name, frames written)` for every decoded video.
    pub extracted: Vec<(String, u64)>,
    /// `(video name, error message)` for every video that failed to decode.
    pub failed: Vec<(String, String)>,
}

/// Decode every video file in `input_directory` into
/// `<output_directory>/<stem>/%08d.jpg` at the options' detector size.
///
/// A video that fails to decode is recorded and the rest are still
/// processed. Frame folders in the input are ignored.
pub fn extract_all_frames<P, Q>(
    input_directory: P,
    output_directory: Q,
    options: &SegmentationOptions,
) -> Result<ExtractionReport, SceneError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let videos: Vec<(String, PathBuf)> = discover_videos(input_directory)?
        .into_iter()
        .filter_map(|entry| match entry.input {
            VideoInput::VideoFile(path) => Some((entry.name, path)),
            VideoInput::FrameFolder(_) => None,
        })
        .collect();

    let output_directory = output_directory.as_ref();
    let (width, height) = options.frame_size();
    let mut tracker = ProgressTracker::new(
        options.progress.clone(),
        OperationType::FrameExtraction,
        Some(videos.len() as u64),
    );
    let mut report = ExtractionReport::default();

    for (name, path) in videos {
        if options.is_cancelled() {
            return Err(SceneError::Cancelled);
        }

        match extract_frames(&path, output_directory.join(&name), width, height) {
            Ok(count) => report.extracted.push((name.clone(), count)),
            Err(error) => {
                log::warn!("Error extracting frames from {}: {error}", path.display());
                report.failed.push((name.clone(), error.to_string()));
            }
        }

        tracker.advance(&name);
    }

    Ok(report)
}
