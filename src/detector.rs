//! Boundary detectors.
//!
//! The pretrained shot-boundary network is an external collaborator; this
//! module defines the seam it plugs into and two stand-ins:
//!
//! - [`HistogramDetector`] scores each frame by how much the luminance
//!   histogram changes into the next frame. It needs no model weights and is
//!   good enough for hard cuts.
//! - [`PrecomputedDetector`] replays probabilities an external model run
//!   already wrote to disk, one value per line.
//!
//! [`FrameDetector`] joins a [`FrameSource`] with a [`BoundaryDetector`] to
//! form a [`WindowDetector`], enforcing the per-window memory budget and the
//! one-probability-per-frame contract.

use std::{
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
};

use image::RgbImage;

use crate::{
    configuration::SegmentationOptions,
    error::SceneError,
    frames::{FrameSource, check_window},
    interval::Window,
    stitch::WindowDetector,
};

/// Scores decoded frames with a per-frame boundary probability.
pub trait BoundaryDetector {
    /// Return one probability in `[0, 1]` per input frame, in frame order.
    fn predict(&self, frames: &[RgbImage]) -> Result<Vec<f64>, SceneError>;
}

/// Luminance-histogram difference detector.
///
/// Frame `i` scores the symmetric chi-squared distance between the
/// normalised histograms of frames `i` and `i + 1`, scaled to `[0, 1]`. The
/// last frame of each call scores 0. A hard cut therefore flags the last
/// frame of the outgoing shot, which the segmenter closes the scene on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistogramDetector {
    bins: usize,
}

impl Default for HistogramDetector {
    fn default() -> Self {
        Self { bins: 64 }
    }
}

impl HistogramDetector {
    /// Create a detector with `bins` luminance buckets (clamped to 2..=256).
    pub fn new(bins: usize) -> Self {
        Self {
            bins: bins.clamp(2, 256),
        }
    }

    /// Number of luminance buckets.
    pub fn bins(&self) -> usize {
        self.bins
    }

    fn histogram(&self, frame: &RgbImage) -> Vec<f64> {
        let mut counts = vec![0_u64; self.bins];
        for pixel in frame.pixels() {
            let [red, green, blue] = pixel.0;
            let luma = (299 * red as u32 + 587 * green as u32 + 114 * blue as u32) / 1000;
            counts[luma as usize * self.bins / 256] += 1;
        }

        let total = counts.iter().sum::<u64>().max(1) as f64;
        counts.into_iter().map(|count| count as f64 / total).collect()
    }
}

/// Symmetric chi-squared distance between two normalised histograms,
/// mapped to `[0, 1]`.
pub(crate) fn histogram_distance(first: &[f64], second: &[f64]) -> f64 {
    let chi_squared: f64 = first
        .iter()
        .zip(second)
        .map(|(&p, &q)| {
            let sum = p + q;
            if sum > 0.0 { (p - q).powi(2) / sum } else { 0.0 }
        })
        .sum();
    (chi_squared / 2.0).clamp(0.0, 1.0)
}

impl BoundaryDetector for HistogramDetector {
    fn predict(&self, frames: &[RgbImage]) -> Result<Vec<f64>, SceneError> {
        let histograms: Vec<Vec<f64>> = frames.iter().map(|frame| self.histogram(frame)).collect();

        let mut probabilities: Vec<f64> = histograms
            .windows(2)
            .map(|pair| histogram_distance(&pair[0], &pair[1]))
            .collect();
        if !frames.is_empty() {
            probabilities.push(0.0);
        }

        Ok(probabilities)
    }
}

/// Adapts a frame source and a frame-level detector into a
/// [`WindowDetector`].
pub struct FrameDetector<'a, S: ?Sized, D: ?Sized> {
    source: &'a S,
    detector: &'a D,
    max_window_bytes: Option<u64>,
    frame_bytes: u64,
}

impl<'a, S, D> FrameDetector<'a, S, D>
where
    S: FrameSource + ?Sized,
    D: BoundaryDetector + ?Sized,
{
    /// Pair `source` with `detector`, taking the memory budget and frame size
    /// from `options`.
    pub fn new(source: &'a S, detector: &'a D, options: &SegmentationOptions) -> Self {
        Self {
            source,
            detector,
            max_window_bytes: options.max_window_bytes,
            frame_bytes: options.frame_bytes(),
        }
    }
}

impl<S, D> WindowDetector for FrameDetector<'_, S, D>
where
    S: FrameSource + ?Sized,
    D: BoundaryDetector + ?Sized,
{
    fn detect(&self, window: Window) -> Result<Vec<f64>, SceneError> {
        check_window(window, self.source.frame_count())?;

        let required = window.len().saturating_mul(self.frame_bytes);
        if let Some(budget) = self.max_window_bytes
            && required > budget
        {
            return Err(SceneError::ResourceExhausted(format!(
                "window {window} needs {required} bytes of frames, budget is {budget}"
            )));
        }

        let frames = self.source.frames(window)?;
        let probabilities = self.detector.predict(&frames)?;

        if probabilities.len() != frames.len() {
            return Err(SceneError::UpstreamFailure(format!(
                "detector returned {} probabilities for {} frames",
                probabilities.len(),
                frames.len()
            )));
        }
        if let Some(value) = probabilities.iter().find(|value| !value.is_finite()) {
            return Err(SceneError::UpstreamFailure(format!(
                "detector returned a non-finite probability ({value}) in window {window}"
            )));
        }

        Ok(probabilities)
    }
}

/// Probabilities produced ahead of time by an external detector.
#[derive(Debug, Clone, PartialEq)]
pub struct PrecomputedDetector {
    probabilities: Vec<f64>,
}

impl PrecomputedDetector {
    /// Wrap an in-memory probability signal.
    pub fn new(probabilities: Vec<f64>) -> Self {
        Self { probabilities }
    }

    /// Parse one probability per line; blank lines are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidInput`] naming the first line that is
    /// not a finite number.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, SceneError> {
        let mut probabilities = Vec::new();
        for (line_index, line) in BufReader::new(reader).lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let value = trimmed
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .ok_or_else(|| {
                    SceneError::InvalidInput(format!(
                        "line {}: invalid probability {trimmed:?}",
                        line_index + 1
                    ))
                })?;
            probabilities.push(value);
        }
        Ok(Self { probabilities })
    }

    /// Load a probability file from `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SceneError> {
        let path = path.as_ref();
        Self::from_reader(File::open(path)?).map_err(|error| match error {
            SceneError::InvalidInput(message) => {
                SceneError::InvalidInput(format!("{}: {message}", path.display()))
            }
            other => other,
        })
    }

    /// Number of frames the signal covers.
    pub fn frame_count(&self) -> u64 {
        self.probabilities.len() as u64
    }
}

impl WindowDetector for PrecomputedDetector {
    fn detect(&self, window: Window) -> Result<Vec<f64>, SceneError> {
        if window.start > window.end {
            return Err(SceneError::InvalidInput(format!(
                "window {window} starts after it ends"
            )));
        }
        if window.end >= self.frame_count() {
            return Err(SceneError::UpstreamFailure(format!(
                "precomputed signal has {} frame(s), window {window} is past its end",
                self.frame_count()
            )));
        }
        Ok(self.probabilities[window.start as usize..=window.end as usize].to_vec())
    }
}
