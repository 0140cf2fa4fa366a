//! Boundary segmentation tests.

use sceneslice::{Interval, SceneError, segment};

fn intervals(pairs: &[(u64, u64)]) -> Vec<Interval> {
    pairs
        .iter()
        .map(|&(start, end)| Interval { start, end })
        .collect()
}

fn from_bits(bits: &[u8]) -> Vec<f64> {
    bits.iter().map(|&bit| if bit == 1 { 0.9 } else { 0.1 }).collect()
}

// ── Runs and boundaries ────────────────────────────────────────

#[test]
fn boundary_frame_closes_its_scene() {
    let scenes = segment(&from_bits(&[0, 0, 1, 0, 0, 1, 1, 0]), 0.5).expect("segment");
    assert_eq!(scenes, intervals(&[(0, 2), (3, 5), (7, 7)]));
}

#[test]
fn no_boundaries_is_one_scene() {
    let scenes = segment(&[0.1, 0.2, 0.3, 0.4], 0.5).expect("segment");
    assert_eq!(scenes, intervals(&[(0, 3)]));
}

#[test]
fn all_boundaries_is_one_scene() {
    let scenes = segment(&[0.9, 0.9, 0.9], 0.5).expect("segment");
    assert_eq!(scenes, intervals(&[(0, 2)]));
}

#[test]
fn trailing_boundary_ends_last_scene() {
    let scenes = segment(&from_bits(&[0, 0, 1]), 0.5).expect("segment");
    assert_eq!(scenes, intervals(&[(0, 2)]));
}

#[test]
fn leading_boundary_does_not_open_a_scene() {
    let scenes = segment(&from_bits(&[1, 0, 0, 1, 0]), 0.5).expect("segment");
    assert_eq!(scenes, intervals(&[(1, 3), (4, 4)]));
}

#[test]
fn single_frame_window() {
    assert_eq!(segment(&[0.0], 0.5).expect("segment"), intervals(&[(0, 0)]));
    assert_eq!(segment(&[1.0], 0.5).expect("segment"), intervals(&[(0, 0)]));
}

// ── Threshold ──────────────────────────────────────────────────

#[test]
fn threshold_is_strict() {
    let scenes = segment(&[0.0, 0.5, 0.0, 0.0], 0.5).expect("segment");
    assert_eq!(scenes, intervals(&[(0, 3)]));

    let scenes = segment(&[0.0, 0.51, 0.0, 0.0], 0.5).expect("segment");
    assert_eq!(scenes, intervals(&[(0, 1), (2, 3)]));
}

#[test]
fn scenes_are_ordered_and_in_bounds() {
    let probabilities: Vec<f64> = (0..200)
        .map(|frame| if frame % 17 == 0 || frame % 23 == 0 { 0.8 } else { 0.2 })
        .collect();
    let scenes = segment(&probabilities, 0.5).expect("segment");

    for scene in &scenes {
        assert!(scene.start <= scene.end);
        assert!(scene.end < probabilities.len() as u64);
    }
    for pair in scenes.windows(2) {
        assert!(pair[0].start < pair[1].start);
    }
}

// ── Invalid input ──────────────────────────────────────────────

#[test]
fn empty_sequence_is_invalid() {
    let result = segment(&[], 0.5);
    assert!(matches!(result, Err(SceneError::InvalidInput(_))));
}
