//! Pipeline tests: plan, detect, stitch, consolidate, persist, split.

use std::{fs, path::Path};

use image::{Rgb, RgbImage};
use sceneslice::{
    Detection, HistogramDetector, Interval, SceneError, SegmentationOptions, Window, consolidate,
    count_scene_folders, load_index, plan_windows, run_batch, split_frames, stitch,
};

fn pairs(intervals: &[Interval]) -> Vec<(u64, u64)> {
    intervals.iter().map(|i| (i.start, i.end)).collect()
}

/// No interval may span a cut between `cut` and `cut + 1`.
fn assert_respects_cut(intervals: &[Interval], cut: u64) {
    for interval in intervals {
        assert!(
            !(interval.start <= cut && interval.end > cut),
            "{interval:?} crosses the cut after frame {cut}"
        );
    }
}

// ── Synthetic signal ───────────────────────────────────────────

#[test]
fn hundred_frames_two_cuts() {
    let signal: Vec<f64> = (0..100)
        .map(|frame| if frame == 20 || frame == 70 { 0.95 } else { 0.05 })
        .collect();
    let detector = |window: Window| -> Result<Vec<f64>, SceneError> {
        Ok(signal[window.start as usize..=window.end as usize].to_vec())
    };

    let windows = plan_windows(100, 60).expect("plan");
    assert_eq!(
        windows,
        vec![
            Window { start: 0, end: 59 },
            Window { start: 30, end: 89 },
            Window { start: 60, end: 99 },
        ]
    );

    let stitched = stitch(&windows, &detector, 0.5).expect("stitch");
    let scenes = consolidate(stitched).expect("consolidate");

    assert_eq!(pairs(&scenes), vec![(0, 20), (21, 59), (30, 70), (71, 99)]);
    assert_eq!(scenes.first().map(|scene| scene.start), Some(0));
    assert_eq!(scenes.last().map(|scene| scene.end), Some(99));
    assert_respects_cut(&scenes, 20);
    assert_respects_cut(&scenes, 70);
}

// ── Frame folders on disk ──────────────────────────────────────

fn write_shot(directory: &Path, shades: &[(u8, usize)]) {
    fs::create_dir_all(directory).expect("create frame folder");
    let mut number = 1;
    for &(shade, length) in shades {
        for _ in 0..length {
            RgbImage::from_pixel(48, 27, Rgb([shade, shade, shade]))
                .save(directory.join(format!("{number:08}.png")))
                .expect("write frame");
            number += 1;
        }
    }
}

#[test]
fn frame_folder_to_scene_folders() {
    let root = tempfile::tempdir().expect("Failed to create temp dir");
    let frames = root.path().join("frames");
    let index = root.path().join("split_idx");
    let output = root.path().join("split_frames");
    // Three ten-frame shots: cuts after frames 9 and 19.
    write_shot(&frames.join("clip"), &[(0, 10), (128, 10), (255, 10)]);

    let options = SegmentationOptions::new().with_window_capacity(12);
    let detection = Detection::Histogram(HistogramDetector::default());
    let report = run_batch(&frames, &index, &detection, &options).expect("batch");
    assert!(report.is_complete());

    let raw = load_index(index.join("clip.txt")).expect("load");
    let scenes = consolidate(raw).expect("consolidate");
    assert_eq!(pairs(&scenes), vec![(0, 9), (10, 17), (12, 19), (20, 29)]);
    assert_respects_cut(&scenes, 9);
    assert_respects_cut(&scenes, 19);

    let split = split_frames(&frames, &index, &output, &options).expect("split");
    assert_eq!(split.scene_count(), 4);
    assert_eq!(count_scene_folders(&output).expect("count"), 4);
}
