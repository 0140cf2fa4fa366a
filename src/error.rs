//! Error types for the `sceneslice` crate.
//!
//! This module defines [`SceneError`], the unified error type returned by all
//! fallible operations in the crate. The first three variants form the
//! pipeline's failure taxonomy: bad caller input, a detector running out of
//! resources for one video, and any other detector failure. The remaining
//! variants wrap I/O, image, and FFmpeg errors with enough context to locate
//! the offending file.

use std::{io::Error as IoError, path::PathBuf};

use ffmpeg_next::Error as FfmpegError;
use image::ImageError;
use thiserror::Error;

/// The unified error type for all `sceneslice` operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SceneError {
    /// Malformed parameters, a malformed index line, or an empty interval
    /// collection. Never coerced into a default.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The detector ran out of memory or device capacity for a window.
    ///
    /// Batch runs skip the current video and continue with the next one.
    #[error("Resource exhausted: {0}")]
    ResourceExhausted(String),

    /// Any other detector failure, such as a probability sequence whose
    /// length does not match the window.
    #[error("Detector failure: {0}")]
    UpstreamFailure(String),

    /// A video file could not be opened.
    #[error("Failed to open media file at {path}: {reason}")]
    FileOpen {
        /// Path that was passed to the decoder.
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// The file does not contain a video stream.
    #[error("No video stream found in file")]
    NoVideoStream,

    /// A video frame could not be decoded.
    #[error("Failed to decode video frame: {0}")]
    VideoDecodeError(String),

    /// An error originating from the FFmpeg libraries.
    #[error("FFmpeg error: {0}")]
    FfmpegError(String),

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    IoError(#[from] IoError),

    /// An error from the `image` crate while loading or saving frames.
    #[error("Image processing error: {0}")]
    ImageError(#[from] ImageError),

    /// The operation was cancelled via a [`CancellationToken`](crate::CancellationToken).
    #[error("Operation cancelled")]
    Cancelled,
}

impl SceneError {
    /// Returns `true` for failures that abandon only the current video.
    pub fn is_resource_exhausted(&self) -> bool {
        matches!(self, SceneError::ResourceExhausted(_))
    }
}

impl From<FfmpegError> for SceneError {
    fn from(error: FfmpegError) -> Self {
        SceneError::FfmpegError(error.to_string())
    }
}
