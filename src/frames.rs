//! Frame sources.
//!
//! A [`FrameSource`] hands the detector the decoded frames of one window.
//! Two sources are provided: [`FrameFolder`], a directory of pre-extracted
//! frame images loaded lazily per window, and [`DecodedVideo`], a video file
//! decoded up front with FFmpeg at detector resolution. Frames are small
//! RGB8 images (48x27 by default), so holding a whole video in memory is
//! affordable.
//!
//! [`extract_frames`] writes a video's frames to disk in the layout
//! [`FrameFolder`] reads back.

use std::{
    ffi::OsStr,
    fs,
    path::{Path, PathBuf},
};

use ffmpeg_next::{
    codec::context::Context as CodecContext,
    format::Pixel,
    frame::Video as VideoFrame,
    media::Type,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
    util::log::Level as LogLevel,
};
use image::{RgbImage, imageops::FilterType};

use crate::{error::SceneError, interval::Window};

/// File extensions recognised as frame images.
pub const FRAME_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Supplies decoded frames for a window.
///
/// Frames come back in frame order and cover exactly
/// `window.start..=window.end`.
pub trait FrameSource {
    /// Total number of frames available.
    fn frame_count(&self) -> u64;

    /// Load the frames of `window`.
    fn frames(&self, window: Window) -> Result<Vec<RgbImage>, SceneError>;
}

pub(crate) fn check_window(window: Window, frame_count: u64) -> Result<(), SceneError> {
    if window.start > window.end {
        return Err(SceneError::InvalidInput(format!(
            "window {window} starts after it ends"
        )));
    }
    if window.end >= frame_count {
        return Err(SceneError::InvalidInput(format!(
            "window {window} is outside the {frame_count} available frame(s)"
        )));
    }
    Ok(())
}

/// A directory of frame images, one file per frame.
///
/// Frame order is the lexicographic order of the file names, so
/// zero-padded names (`00000001.jpg`, ...) are expected. Files without an
/// image extension are ignored.
#[derive(Debug, Clone)]
pub struct FrameFolder {
    directory: PathBuf,
    files: Vec<PathBuf>,
    width: u32,
    height: u32,
}

impl FrameFolder {
    /// Index the frames in `directory`; frames are resized to
    /// `width` x `height` when loaded.
    pub fn open<P: AsRef<Path>>(directory: P, width: u32, height: u32) -> Result<Self, SceneError> {
        let directory = directory.as_ref().to_path_buf();
        let files = list_frame_files(&directory)?;

        log::debug!(
            "Indexed {} frame(s) in {}",
            files.len(),
            directory.display()
        );

        Ok(Self {
            directory,
            files,
            width,
            height,
        })
    }

    /// The directory this folder was opened from.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Frame file paths in frame order.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Returns `true` if the folder holds no frame images.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl FrameSource for FrameFolder {
    fn frame_count(&self) -> u64 {
        self.files.len() as u64
    }

    fn frames(&self, window: Window) -> Result<Vec<RgbImage>, SceneError> {
        check_window(window, self.frame_count())?;

        self.files[window.start as usize..=window.end as usize]
            .iter()
            .map(|path| {
                let image = image::open(path)?.to_rgb8();
                if image.dimensions() == (self.width, self.height) {
                    Ok(image)
                } else {
                    Ok(image::imageops::resize(
                        &image,
                        self.width,
                        self.height,
                        FilterType::Triangle,
                    ))
                }
            })
            .collect()
    }
}

/// List frame image files in `directory`, sorted by file name.
pub fn list_frame_files(directory: &Path) -> Result<Vec<PathBuf>, SceneError> {
    let mut files: Vec<PathBuf> = fs::read_dir(directory)?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.is_file() && has_extension(path, FRAME_EXTENSIONS))
        .collect();
    files.sort();
    Ok(files)
}

pub(crate) fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|extension| {
            extensions
                .iter()
                .any(|candidate| extension.eq_ignore_ascii_case(candidate))
        })
}

/// A whole video decoded into detector-sized frames.
#[derive(Debug, Clone)]
pub struct DecodedVideo {
    frames: Vec<RgbImage>,
}

impl DecodedVideo {
    /// Decode every frame of the video at `path`, scaled to
    /// `width` x `height`.
    ///
    /// # Errors
    ///
    /// - [`SceneError::FileOpen`] if the file cannot be opened.
    /// - [`SceneError::NoVideoStream`] if it has no video stream.
    /// - [`SceneError::VideoDecodeError`] if decoding fails.
    pub fn open<P: AsRef<Path>>(path: P, width: u32, height: u32) -> Result<Self, SceneError> {
        let mut frames = Vec::new();
        decode_video(path.as_ref(), width, height, |_, image| {
            frames.push(image);
            Ok(())
        })?;
        Ok(Self { frames })
    }

    /// Wrap frames that were decoded elsewhere.
    pub fn from_frames(frames: Vec<RgbImage>) -> Self {
        Self { frames }
    }
}

impl FrameSource for DecodedVideo {
    fn frame_count(&self) -> u64 {
        self.frames.len() as u64
    }

    fn frames(&self, window: Window) -> Result<Vec<RgbImage>, SceneError> {
        check_window(window, self.frame_count())?;
        Ok(self.frames[window.start as usize..=window.end as usize].to_vec())
    }
}

/// Decode every frame of `path` into `output_directory` as numbered JPEGs.
///
/// Files are named `%08d.jpg`, numbered from 1. Returns the number of frames
/// written.
pub fn extract_frames<P, Q>(
    path: P,
    output_directory: Q,
    width: u32,
    height: u32,
) -> Result<u64, SceneError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let output_directory = output_directory.as_ref();
    fs::create_dir_all(output_directory)?;

    let mut written = 0_u64;
    decode_video(path.as_ref(), width, height, |frame_number, image| {
        let file = output_directory.join(format!("{:08}.jpg", frame_number + 1));
        image.save(&file)?;
        written += 1;
        Ok(())
    })?;

    log::info!(
        "Extracted {} frame(s) from {} to {}",
        written,
        path.as_ref().display(),
        output_directory.display()
    );

    Ok(written)
}

/// Decode the best video stream of `path` in presentation order, passing
/// each frame, scaled to `width` x `height`, to `handler` with its ordinal.
pub fn decode_video<F>(path: &Path, width: u32, height: u32, mut handler: F) -> Result<(), SceneError>
where
    F: FnMut(u64, RgbImage) -> Result<(), SceneError>,
{
    log::debug!("Decoding video: {}", path.display());

    ffmpeg_next::init().map_err(|error| SceneError::FileOpen {
        path: path.to_path_buf(),
        reason: format!("FFmpeg initialisation failed: {error}"),
    })?;
    ffmpeg_next::util::log::set_level(LogLevel::Error);

    let mut input_context =
        ffmpeg_next::format::input(&path).map_err(|error| SceneError::FileOpen {
            path: path.to_path_buf(),
            reason: error.to_string(),
        })?;

    let stream = input_context
        .streams()
        .best(Type::Video)
        .ok_or(SceneError::NoVideoStream)?;
    let video_stream_index = stream.index();
    let decoder_context = CodecContext::from_parameters(stream.parameters())?;
    let mut decoder = decoder_context.decoder().video()?;

    let mut scaler = ScalingContext::get(
        decoder.format(),
        decoder.width(),
        decoder.height(),
        Pixel::RGB24,
        width,
        height,
        ScalingFlags::BILINEAR,
    )?;

    let mut decoded_frame = VideoFrame::empty();
    let mut rgb_frame = VideoFrame::empty();
    let mut frame_number = 0_u64;

    let mut drain = |decoder: &mut ffmpeg_next::decoder::Video,
                     frame_number: &mut u64|
     -> Result<(), SceneError> {
        while decoder.receive_frame(&mut decoded_frame).is_ok() {
            scaler.run(&decoded_frame, &mut rgb_frame)?;
            let image = frame_to_image(&rgb_frame, width, height)?;
            handler(*frame_number, image)?;
            *frame_number += 1;
        }
        Ok(())
    };

    for (stream, packet) in input_context.packets() {
        if stream.index() != video_stream_index {
            continue;
        }
        decoder
            .send_packet(&packet)
            .map_err(|error| SceneError::VideoDecodeError(error.to_string()))?;
        drain(&mut decoder, &mut frame_number)?;
    }

    decoder
        .send_eof()
        .map_err(|error| SceneError::VideoDecodeError(error.to_string()))?;
    drain(&mut decoder, &mut frame_number)?;

    log::debug!("Decoded {} frame(s) from {}", frame_number, path.display());

    Ok(())
}

/// Copy an RGB24 frame into a tightly packed [`RgbImage`].
fn frame_to_image(frame: &VideoFrame, width: u32, height: u32) -> Result<RgbImage, SceneError> {
    let stride = frame.stride(0);
    let row_bytes = width as usize * 3;
    let data = frame.data(0);

    let buffer = if stride == row_bytes {
        data[..row_bytes * height as usize].to_vec()
    } else {
        let mut buffer = Vec::with_capacity(row_bytes * height as usize);
        for row in 0..height as usize {
            let row_start = row * stride;
            buffer.extend_from_slice(&data[row_start..row_start + row_bytes]);
        }
        buffer
    };

    RgbImage::from_raw(width, height, buffer).ok_or_else(|| {
        SceneError::VideoDecodeError("Failed to create image from decoded frame".to_string())
    })
}
