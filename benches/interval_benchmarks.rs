//! Benchmarks for window planning, segmentation, and consolidation.
//!
//! Run with: cargo bench
//! Run with all features: cargo bench --all-features
//!
//! The histogram benchmark decodes `tests/fixtures/sample_video.mp4` and is
//! skipped when it is absent.

use std::{hint::black_box, path::Path};

use criterion::Criterion;
use sceneslice::{
    BoundaryDetector, DecodedVideo, FrameSource, HistogramDetector, Interval, SceneError, Window,
    consolidate, plan_windows, segment, stitch,
};

const SAMPLE_VIDEO: &str = "tests/fixtures/sample_video.mp4";

/// A two-hour, 25 fps signal with a cut every 90 frames.
fn long_signal() -> Vec<f64> {
    (0..180_000)
        .map(|frame| if frame % 90 == 89 { 0.9 } else { 0.05 })
        .collect()
}

fn benchmark_window_planning(criterion: &mut Criterion) {
    criterion.bench_function("plan windows (180k frames, capacity 1500)", |bencher| {
        bencher.iter(|| plan_windows(black_box(180_000), black_box(1500)));
    });
}

fn benchmark_segmentation(criterion: &mut Criterion) {
    let signal = long_signal();
    criterion.bench_function("segment 1500-frame window", |bencher| {
        bencher.iter(|| segment(black_box(&signal[..1500]), 0.5));
    });
}

fn benchmark_stitch_and_consolidate(criterion: &mut Criterion) {
    let signal = long_signal();
    let detector = |window: Window| -> Result<Vec<f64>, SceneError> {
        Ok(signal[window.start as usize..=window.end as usize].to_vec())
    };
    let windows = plan_windows(signal.len() as u64, 1500).unwrap();

    criterion.bench_function("stitch 180k frames", |bencher| {
        bencher.iter(|| stitch(black_box(&windows), &detector, 0.5));
    });

    let stitched: Vec<Interval> = stitch(&windows, &detector, 0.5).unwrap();
    criterion.bench_function("consolidate stitched intervals", |bencher| {
        bencher.iter(|| consolidate(black_box(stitched.clone())));
    });

    #[cfg(feature = "rayon")]
    criterion.bench_function("stitch 180k frames (parallel)", |bencher| {
        bencher.iter(|| sceneslice::stitch_parallel(black_box(&windows), &detector, 0.5));
    });
}

fn benchmark_histogram_detector(criterion: &mut Criterion) {
    if !Path::new(SAMPLE_VIDEO).exists() {
        eprintln!("Skipping benchmark: fixture not found");
        return;
    }

    let video = DecodedVideo::open(SAMPLE_VIDEO, 48, 27).unwrap();
    let last = video.frame_count().min(1500) - 1;
    let frames = video.frames(Window { start: 0, end: last }).unwrap();
    let detector = HistogramDetector::default();

    criterion.bench_function("histogram detector (sample video window)", |bencher| {
        bencher.iter(|| detector.predict(black_box(&frames)));
    });
}

criterion::criterion_group!(
    benches,
    benchmark_window_planning,
    benchmark_segmentation,
    benchmark_stitch_and_consolidate,
    benchmark_histogram_detector,
);
criterion::criterion_main!(benches);
