//! SegmentationOptions and progress/cancellation tests.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use sceneslice::{
    CancellationToken, DEFAULT_THRESHOLD, DEFAULT_WINDOW_CAPACITY, ProgressCallback,
    ProgressInfo, SceneError, SegmentationOptions,
};

// ── SegmentationOptions builder ────────────────────────────────

#[test]
fn options_defaults() {
    let options = SegmentationOptions::new();
    assert_eq!(options.threshold(), DEFAULT_THRESHOLD);
    assert_eq!(options.window_capacity(), DEFAULT_WINDOW_CAPACITY);
    assert_eq!(options.frame_size(), (48, 27));
    assert!(options.validate().is_ok());

    let debug = format!("{options:?}");
    assert!(debug.contains("SegmentationOptions"));
    assert!(debug.contains("has_cancellation: false"));
    assert!(debug.contains("max_window_bytes: None"));
}

#[test]
fn options_builder_chain() {
    let options = SegmentationOptions::new()
        .with_threshold(0.3)
        .with_window_capacity(100)
        .with_frame_size(64, 36)
        .with_max_window_bytes(1 << 20)
        .with_cancellation(CancellationToken::new());

    assert_eq!(options.threshold(), 0.3);
    assert_eq!(options.window_capacity(), 100);
    assert_eq!(options.frame_size(), (64, 36));

    let debug = format!("{options:?}");
    assert!(debug.contains("has_cancellation: true"));
    assert!(debug.contains("max_window_bytes: Some(1048576)"));
}

#[test]
fn options_validation() {
    let invalid = [
        SegmentationOptions::new().with_window_capacity(0),
        SegmentationOptions::new().with_threshold(1.5),
        SegmentationOptions::new().with_threshold(-0.1),
        SegmentationOptions::new().with_threshold(f64::NAN),
        SegmentationOptions::new().with_frame_size(0, 27),
    ];
    for options in invalid {
        assert!(
            matches!(options.validate(), Err(SceneError::InvalidInput(_))),
            "{options:?} should be rejected"
        );
    }

    assert!(SegmentationOptions::new().with_threshold(0.0).validate().is_ok());
    assert!(SegmentationOptions::new().with_threshold(1.0).validate().is_ok());
}

#[test]
fn options_default_trait() {
    let options = SegmentationOptions::default();
    assert_eq!(options.window_capacity(), DEFAULT_WINDOW_CAPACITY);
}

// ── CancellationToken ──────────────────────────────────────────

#[test]
fn cancellation_token_default_not_cancelled() {
    assert!(!CancellationToken::new().is_cancelled());
    assert!(!CancellationToken::default().is_cancelled());
}

#[test]
fn cancellation_token_clone_shares_state() {
    let token = CancellationToken::new();
    let clone = token.clone();
    assert!(!clone.is_cancelled());

    token.cancel();
    assert!(clone.is_cancelled());
}

// ── ProgressCallback ───────────────────────────────────────────

struct CountingProgress {
    calls: AtomicU64,
}

impl ProgressCallback for CountingProgress {
    fn on_progress(&self, _info: &ProgressInfo) {
        self.calls.fetch_add(1, Ordering::Relaxed);
    }
}

#[test]
fn progress_callback_is_shared() {
    let progress = Arc::new(CountingProgress {
        calls: AtomicU64::new(0),
    });
    let options = SegmentationOptions::new().with_progress(progress.clone());
    let cloned = options.clone();

    let debug = format!("{cloned:?}");
    assert!(debug.contains("SegmentationOptions"));
    assert_eq!(Arc::strong_count(&progress), 3);
    assert_eq!(progress.calls.load(Ordering::Relaxed), 0);
}
