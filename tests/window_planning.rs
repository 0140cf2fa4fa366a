//! Window planner tests.

use sceneslice::{SceneError, Window, plan_windows};

fn spans(windows: &[Window]) -> Vec<(u64, u64)> {
    windows.iter().map(|window| (window.start, window.end)).collect()
}

// ── Worked examples ─────────────────────────────────────────────

#[test]
fn twenty_five_frames_capacity_ten() {
    let windows = plan_windows(25, 10).expect("plan");
    assert_eq!(spans(&windows), vec![(0, 9), (5, 14), (10, 19), (15, 24)]);
}

#[test]
fn hundred_frames_capacity_sixty() {
    let windows = plan_windows(100, 60).expect("plan");
    assert_eq!(spans(&windows), vec![(0, 59), (30, 89), (60, 99)]);
}

#[test]
fn sequence_within_capacity_is_one_window() {
    let windows = plan_windows(8, 10).expect("plan");
    assert_eq!(spans(&windows), vec![(0, 7)]);

    let windows = plan_windows(10, 10).expect("plan");
    assert_eq!(spans(&windows), vec![(0, 9)]);
}

#[test]
fn single_frame() {
    let windows = plan_windows(1, 1500).expect("plan");
    assert_eq!(spans(&windows), vec![(0, 0)]);
}

#[test]
fn capacity_of_one_walks_every_frame() {
    let windows = plan_windows(4, 1).expect("plan");
    assert_eq!(spans(&windows), vec![(0, 0), (1, 1), (2, 2), (3, 3)]);
}

// ── Invariants ─────────────────────────────────────────────────

#[test]
fn windows_cover_range_within_capacity() {
    for total in [1_u64, 2, 7, 59, 60, 61, 100, 1499, 1500, 1501, 4321] {
        for capacity in [1_u64, 2, 3, 10, 60, 1500] {
            let windows = plan_windows(total, capacity).expect("plan");

            assert_eq!(windows[0].start, 0, "total={total} capacity={capacity}");
            assert_eq!(
                windows.last().map(|window| window.end),
                Some(total - 1),
                "total={total} capacity={capacity}"
            );

            for window in &windows {
                assert!(window.start <= window.end);
                assert!(window.len() <= capacity);
            }

            for pair in windows.windows(2) {
                assert!(pair[1].start > pair[0].start, "starts must increase");
                assert!(pair[1].start <= pair[0].end + 1, "no gaps between windows");
            }
        }
    }
}

#[test]
fn consecutive_windows_start_past_midpoint() {
    let windows = plan_windows(4321, 1500).expect("plan");
    for pair in windows.windows(2) {
        assert_eq!(pair[1].start, (pair[0].start + pair[0].end) / 2 + 1);
    }
}

// ── Invalid input ──────────────────────────────────────────────

#[test]
fn zero_frames_is_invalid() {
    let result = plan_windows(0, 10);
    assert!(matches!(result, Err(SceneError::InvalidInput(_))));
}

#[test]
fn zero_capacity_is_invalid() {
    let result = plan_windows(10, 0);
    assert!(matches!(result, Err(SceneError::InvalidInput(_))));
}
