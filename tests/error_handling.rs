//! Error handling integration tests.
//!
//! These tests verify that each failure class surfaces as the right
//! `SceneError` variant with a useful message.

use std::path::Path;

use sceneslice::{DecodedVideo, FrameFolder, Interval, SceneError, extract_frames, plan_windows};

#[test]
fn invalid_input_message() {
    let error = plan_windows(0, 10).unwrap_err();
    assert!(matches!(error, SceneError::InvalidInput(_)));
    assert!(
        error.to_string().starts_with("Invalid input:"),
        "message: {error}"
    );
}

#[test]
fn resource_exhausted_is_identified() {
    let error = SceneError::ResourceExhausted("GPU out of memory".to_string());
    assert!(error.is_resource_exhausted());
    assert_eq!(error.to_string(), "Resource exhausted: GPU out of memory");

    let other = SceneError::UpstreamFailure("model crashed".to_string());
    assert!(!other.is_resource_exhausted());
    assert_eq!(other.to_string(), "Detector failure: model crashed");
}

#[test]
fn io_errors_convert() {
    let error: SceneError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
    assert!(matches!(error, SceneError::IoError(_)));
}

#[test]
fn reversed_interval_message() {
    let error = Interval::new(9, 2).unwrap_err().to_string();
    assert!(error.contains("start (9)"), "message: {error}");
}

#[test]
fn missing_frame_folder() {
    let result = FrameFolder::open("this_folder_does_not_exist", 48, 27);
    assert!(matches!(result, Err(SceneError::IoError(_))));
}

#[test]
fn open_nonexistent_video() {
    let result = DecodedVideo::open("this_file_does_not_exist.mp4", 48, 27);
    let error_message = result.unwrap_err().to_string();
    assert!(
        error_message.contains("Failed to open media file"),
        "Error message should mention file open failure: {error_message}",
    );
}

#[test]
fn open_invalid_video() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let invalid_file_path = temporary_directory.path().join("invalid.mp4");
    std::fs::write(&invalid_file_path, b"this is not a media file")
        .expect("Failed to write invalid file");

    let result = DecodedVideo::open(&invalid_file_path, 48, 27);
    assert!(result.is_err(), "Expected error for invalid media file");
}

#[test]
fn audio_only_file_has_no_video_stream() {
    let path = "tests/fixtures/sample_audio_only.mp4";
    if !Path::new(path).exists() {
        return;
    }

    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let result = extract_frames(path, temporary_directory.path(), 48, 27);
    assert!(matches!(result, Err(SceneError::NoVideoStream)));
}
