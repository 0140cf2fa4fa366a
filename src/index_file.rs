//! Persisted interval ("index") files.
//!
//! One interval per line, `"<start> <end>\n"`, space-separated decimal
//! frame indices, no header. Files are written once per source video by the
//! split-index stage and read back when frames are split or passes merged.

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Read, Write},
    path::Path,
};

use crate::{error::SceneError, interval::Interval};

/// Write intervals in index-file format, preserving their order.
pub fn write_intervals<W: Write>(mut writer: W, intervals: &[Interval]) -> Result<(), SceneError> {
    for interval in intervals {
        writeln!(writer, "{interval}")?;
    }
    writer.flush()?;
    Ok(())
}

/// Read intervals in index-file format, preserving their order.
///
/// Blank lines are skipped. Any other line that is not two non-negative
/// integers with `start <= end` is an error.
///
/// # Errors
///
/// Returns [`SceneError::InvalidInput`] naming the 1-based line number of
/// the first malformed line.
pub fn read_intervals<R: Read>(reader: R) -> Result<Vec<Interval>, SceneError> {
    let mut intervals = Vec::new();

    for (line_index, line) in BufReader::new(reader).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let interval = line.parse::<Interval>().map_err(|error| {
            SceneError::InvalidInput(format!("line {}: {error}", line_index + 1))
        })?;
        intervals.push(interval);
    }

    Ok(intervals)
}

/// Write an index file to `path`, replacing any existing file.
pub fn save_index<P: AsRef<Path>>(path: P, intervals: &[Interval]) -> Result<(), SceneError> {
    let path = path.as_ref();
    log::debug!("Writing {} interval(s) to {}", intervals.len(), path.display());
    let file = File::create(path)?;
    write_intervals(BufWriter::new(file), intervals)
}

/// Load an index file from `path`.
///
/// # Errors
///
/// Parse errors are reported as [`SceneError::InvalidInput`] prefixed with
/// the file path.
pub fn load_index<P: AsRef<Path>>(path: P) -> Result<Vec<Interval>, SceneError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    read_intervals(file).map_err(|error| match error {
        SceneError::InvalidInput(message) => {
            SceneError::InvalidInput(format!("{}: {message}", path.display()))
        }
        other => other,
    })
}
