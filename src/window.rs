//! Window planning.
//!
//! A detector has a fixed processing capacity, so long frame sequences are
//! cut into bounded windows. Consecutive windows overlap by roughly half
//! their span: each window starts one frame past the midpoint of the
//! previous one. A boundary that lands near the edge of one window therefore
//! sits well inside the next.
//!
//! # Example
//!
//! ```
//! use sceneslice::{Window, plan_windows};
//!
//! let windows = plan_windows(25, 10)?;
//! assert_eq!(windows, vec![
//!     Window { start: 0, end: 9 },
//!     Window { start: 5, end: 14 },
//!     Window { start: 10, end: 19 },
//!     Window { start: 15, end: 24 },
//! ]);
//! # Ok::<(), sceneslice::SceneError>(())
//! ```

use crate::{error::SceneError, interval::Window};

/// Plan the overlapping windows that cover frames `0..total_frames`.
///
/// Each window spans at most `window_capacity` frames. The last window
/// always ends at `total_frames - 1`, and a sequence no longer than the
/// capacity yields exactly one window.
///
/// # Errors
///
/// Returns [`SceneError::InvalidInput`] if either argument is zero.
pub fn plan_windows(total_frames: u64, window_capacity: u64) -> Result<Vec<Window>, SceneError> {
    if total_frames == 0 {
        return Err(SceneError::InvalidInput(
            "cannot plan windows for a video with 0 frames".to_string(),
        ));
    }
    if window_capacity == 0 {
        return Err(SceneError::InvalidInput(
            "window capacity must be greater than zero".to_string(),
        ));
    }

    let last_frame = total_frames - 1;
    let mut windows = Vec::new();
    let mut start = 0_u64;

    loop {
        let end = start.saturating_add(window_capacity - 1).min(last_frame);
        windows.push(Window { start, end });
        if end == last_frame {
            break;
        }
        // Midpoint advance; always moves forward since end >= start.
        start = (start + end) / 2 + 1;
    }

    log::debug!(
        "Planned {} window(s) for {} frame(s) (capacity={})",
        windows.len(),
        total_frames,
        window_capacity
    );

    Ok(windows)
}
