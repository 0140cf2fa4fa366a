//! Frame-range value types.
//!
//! [`Window`] is a sub-range of frames submitted to a detector in one call;
//! [`Interval`] is one detected scene. Both are inclusive on both ends and
//! use zero-based frame indices.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use crate::error::SceneError;

/// An inclusive range of frames handed to the detector in one call.
///
/// Produced by [`plan_windows`](crate::plan_windows); `end >= start` always
/// holds for windows built by the planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Window {
    /// First frame of the window.
    pub start: u64,
    /// Last frame of the window (inclusive).
    pub end: u64,
}

impl Window {
    /// Number of frames covered by the window; 0 if `start > end`.
    pub fn len(&self) -> u64 {
        self.end.saturating_add(1).saturating_sub(self.start)
    }

    /// Returns `true` for a reversed window. Planned windows are never empty.
    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }
}

impl Display for Window {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

/// One detected scene, as an inclusive frame range.
///
/// The `Display` form is the on-disk index line, `"<start> <end>"`, and
/// [`FromStr`] parses it back. Parsing is strict: exactly one space between
/// the fields and no surrounding whitespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Interval {
    /// First frame of the scene.
    pub start: u64,
    /// Last frame of the scene (inclusive).
    pub end: u64,
}

impl Interval {
    /// Create an interval, rejecting `start > end`.
    pub fn new(start: u64, end: u64) -> Result<Self, SceneError> {
        if start > end {
            return Err(SceneError::InvalidInput(format!(
                "interval start ({start}) is after its end ({end})"
            )));
        }
        Ok(Self { start, end })
    }

    /// Number of frames in the scene.
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// Intervals always hold at least one frame.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Shift both ends forward by `offset` frames.
    pub fn offset(self, offset: u64) -> Self {
        Self {
            start: self.start + offset,
            end: self.end + offset,
        }
    }

    /// Returns `true` if `other` lies entirely inside this interval.
    pub fn contains(&self, other: &Interval) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl Display for Interval {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{} {}", self.start, self.end)
    }
}

impl FromStr for Interval {
    type Err = SceneError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let Some((start, end)) = line.split_once(' ') else {
            return Err(SceneError::InvalidInput(format!(
                "expected \"<start> <end>\", got {line:?}"
            )));
        };

        let parse = |field: &str| {
            field.parse::<u64>().map_err(|error| {
                SceneError::InvalidInput(format!("invalid frame index {field:?}: {error}"))
            })
        };

        Interval::new(parse(start)?, parse(end)?)
    }
}
