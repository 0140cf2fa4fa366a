//! Interval consolidation.
//!
//! Reduces an unordered, possibly overlapping collection of scene intervals
//! (for instance the duplicated output of overlapping windows, or index
//! files from separate passes) to a canonical set: sorted by start, with no
//! interval nested inside the one kept before it.

use std::cmp::Reverse;

use crate::{error::SceneError, interval::Interval};

/// Consolidate intervals into a minimal, non-redundant set.
///
/// Intervals are sorted by ascending start, ties broken by descending end so
/// the widest interval for a given start comes first. An interval is kept
/// only if it ends strictly after the last kept interval; everything else is
/// contained in (or no wider than) that interval and is dropped.
///
/// The result is idempotent: consolidating it again returns it unchanged.
///
/// # Errors
///
/// Returns [`SceneError::InvalidInput`] if `intervals` is empty.
///
/// # Example
///
/// ```
/// use sceneslice::{Interval, consolidate};
///
/// let input = [(0, 5), (2, 3), (4, 10), (6, 6)]
///     .map(|(start, end)| Interval { start, end });
/// let kept = consolidate(input)?;
/// assert_eq!(kept, vec![Interval { start: 0, end: 5 }, Interval { start: 4, end: 10 }]);
/// # Ok::<(), sceneslice::SceneError>(())
/// ```
pub fn consolidate<I>(intervals: I) -> Result<Vec<Interval>, SceneError>
where
    I: IntoIterator<Item = Interval>,
{
    let mut sorted: Vec<Interval> = intervals.into_iter().collect();
    if sorted.is_empty() {
        return Err(SceneError::InvalidInput(
            "cannot consolidate an empty interval collection".to_string(),
        ));
    }

    sorted.sort_by_key(|interval| (interval.start, Reverse(interval.end)));

    let mut kept: Vec<Interval> = Vec::with_capacity(sorted.len());
    for interval in sorted {
        match kept.last() {
            // Sorted by start, so only the end can escape the last kept interval.
            Some(last) if last.contains(&interval) => {}
            _ => kept.push(interval),
        }
    }

    Ok(kept)
}
