//! Interval consolidation tests.

use sceneslice::{Interval, SceneError, consolidate};

fn intervals(pairs: &[(u64, u64)]) -> Vec<Interval> {
    pairs
        .iter()
        .map(|&(start, end)| Interval { start, end })
        .collect()
}

#[test]
fn drops_nested_intervals() {
    let kept = consolidate(intervals(&[(0, 10), (2, 5), (3, 10)])).expect("consolidate");
    assert_eq!(kept, intervals(&[(0, 10)]));
}

#[test]
fn keeps_partially_overlapping_intervals() {
    let kept = consolidate(intervals(&[(4, 10), (0, 5), (6, 6), (2, 3)])).expect("consolidate");
    assert_eq!(kept, intervals(&[(0, 5), (4, 10)]));
}

#[test]
fn widest_interval_wins_on_equal_start() {
    let kept = consolidate(intervals(&[(0, 3), (0, 9), (0, 5)])).expect("consolidate");
    assert_eq!(kept, intervals(&[(0, 9)]));
}

#[test]
fn removes_duplicates() {
    let kept = consolidate(intervals(&[(5, 8), (0, 4), (5, 8), (0, 4)])).expect("consolidate");
    assert_eq!(kept, intervals(&[(0, 4), (5, 8)]));
}

#[test]
fn single_interval_is_unchanged() {
    let kept = consolidate(intervals(&[(7, 7)])).expect("consolidate");
    assert_eq!(kept, intervals(&[(7, 7)]));
}

#[test]
fn result_is_sorted_and_idempotent() {
    let input = intervals(&[
        (40, 60),
        (0, 20),
        (21, 59),
        (30, 70),
        (71, 89),
        (60, 70),
        (71, 99),
        (10, 15),
    ]);
    let once = consolidate(input).expect("consolidate");

    for pair in once.windows(2) {
        assert!(pair[0].start <= pair[1].start);
        assert!(pair[1].end > pair[0].end, "no kept interval is nested");
    }

    let twice = consolidate(once.clone()).expect("consolidate");
    assert_eq!(once, twice);
}

#[test]
fn every_input_is_covered_by_a_kept_interval() {
    let input = intervals(&[(0, 20), (21, 59), (30, 70), (71, 89), (60, 70), (71, 99), (5, 9)]);
    let kept = consolidate(input.clone()).expect("consolidate");

    assert_eq!(kept, intervals(&[(0, 20), (21, 59), (30, 70), (71, 99)]));
    for interval in &input {
        assert!(
            kept.iter().any(|scene| scene.contains(interval)),
            "{interval:?} is not covered"
        );
    }
    assert!(!Interval { start: 30, end: 70 }.contains(&Interval { start: 21, end: 59 }));
}

#[test]
fn merges_separate_passes() {
    let first_pass = intervals(&[(0, 20), (21, 99)]);
    let second_pass = intervals(&[(0, 20), (21, 50), (51, 99)]);

    let kept = consolidate(first_pass.into_iter().chain(second_pass)).expect("consolidate");
    assert_eq!(kept, intervals(&[(0, 20), (21, 99)]));
}

#[test]
fn empty_collection_is_invalid() {
    let result = consolidate(Vec::new());
    assert!(matches!(result, Err(SceneError::InvalidInput(_))));
}
