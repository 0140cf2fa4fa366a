//! Boundary segmentation.
//!
//! Turns a per-frame boundary probability signal into scene intervals.
//! Each probability is binarized with `probability > threshold`; runs of
//! non-boundary frames become scenes, and the boundary frame that ends a run
//! is included as the run's last frame.

use crate::{error::SceneError, interval::Interval};

/// Segment one window's probabilities into local scene intervals.
///
/// Intervals are in window-local coordinates (`0..probabilities.len()`) and
/// come out in ascending start order. A boundary flagged on frame 0 does not
/// close an (empty) leading run. If no run is ever closed, for example when
/// every frame is above the threshold, the whole window is returned as a
/// single scene.
///
/// # Errors
///
/// Returns [`SceneError::InvalidInput`] for an empty probability slice.
///
/// # Example
///
/// ```
/// use sceneslice::{Interval, segment};
///
/// let scenes = segment(&[0.0, 0.0, 0.9, 0.0, 0.0, 0.9, 0.9, 0.0], 0.5)?;
/// assert_eq!(scenes, vec![
///     Interval { start: 0, end: 2 },
///     Interval { start: 3, end: 5 },
///     Interval { start: 7, end: 7 },
/// ]);
/// # Ok::<(), sceneslice::SceneError>(())
/// ```
pub fn segment(probabilities: &[f64], threshold: f64) -> Result<Vec<Interval>, SceneError> {
    let Some(last_index) = probabilities.len().checked_sub(1) else {
        return Err(SceneError::InvalidInput(
            "cannot segment an empty probability sequence".to_string(),
        ));
    };

    let mut scenes = Vec::new();
    let mut previous_boundary = false;
    let mut run_start = 0_usize;

    for (index, &probability) in probabilities.iter().enumerate() {
        let boundary = probability > threshold;

        if previous_boundary && !boundary {
            run_start = index;
        }
        if !previous_boundary && boundary && index != 0 {
            scenes.push(local_interval(run_start, index));
        }

        previous_boundary = boundary;
    }

    if !previous_boundary {
        scenes.push(local_interval(run_start, last_index));
    }

    if scenes.is_empty() {
        scenes.push(local_interval(0, last_index));
    }

    Ok(scenes)
}

fn local_interval(start: usize, end: usize) -> Interval {
    Interval {
        start: start as u64,
        end: end as u64,
    }
}
