//! Scene folder generation.
//!
//! Given frame folders and their index files, [`split_frames`] builds one
//! folder per consolidated scene, populated with links to the scene's
//! frames:
//!
//! ```text
//! <output>/<video>/Folder1/00000001.jpg -> <frames>/<video>/00000001.jpg
//! <output>/<video>/Folder1/00000002.jpg -> ...
//! <output>/<video>/Folder2/...
//! ```
//!
//! On Unix the entries are symbolic links; elsewhere the frames are copied.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::{
    configuration::SegmentationOptions,
    consolidate::consolidate,
    error::SceneError,
    frames::list_frame_files,
    index_file::load_index,
    progress::{OperationType, ProgressTracker},
};

/// Scene folders created for one video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitVideo {
    /// Video name.
    pub name: String,
    /// Scene folders in scene order.
    pub scene_folders: Vec<PathBuf>,
}

/// Outcome of [`split_frames`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitReport {
    /// Videos that were split.
    pub videos: Vec<SplitVideo>,
    /// Frame folders without an index file.
    pub missing_index: Vec<String>,
}

impl SplitReport {
    /// Total scene folders created across all videos.
    pub fn scene_count(&self) -> usize {
        self.videos.iter().map(|video| video.scene_folders.len()).sum()
    }
}

/// Split every frame folder under `frame_directory` into scene folders
/// under `output_directory`, using `<index_directory>/<name>.txt`.
///
/// Index intervals are consolidated before use. Frame folders without an
/// index file are listed in [`SplitReport::missing_index`] and skipped.
/// Existing links at a destination are replaced.
///
/// # Errors
///
/// Returns [`SceneError::InvalidInput`] if an index file is empty or names
/// a frame past the end of its folder, and [`SceneError::Cancelled`] if the
/// options' token is set between videos.
pub fn split_frames<P, Q, R>(
    frame_directory: P,
    index_directory: Q,
    output_directory: R,
    options: &SegmentationOptions,
) -> Result<SplitReport, SceneError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    R: AsRef<Path>,
{
    let index_directory = index_directory.as_ref();
    let output_directory = output_directory.as_ref();

    let mut frame_folders: Vec<PathBuf> = fs::read_dir(frame_directory.as_ref())?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.is_dir())
        .collect();
    frame_folders.sort();

    let mut tracker = ProgressTracker::new(
        options.progress.clone(),
        OperationType::FrameSplitting,
        Some(frame_folders.len() as u64),
    );
    let mut report = SplitReport::default();

    for frame_folder in frame_folders {
        if options.is_cancelled() {
            return Err(SceneError::Cancelled);
        }

        let Some(name) = frame_folder
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
        else {
            continue;
        };

        let index_path = index_directory.join(format!("{name}.txt"));
        if !index_path.exists() {
            log::debug!("No index file for {name}, skipping");
            report.missing_index.push(name.clone());
            tracker.advance(&name);
            continue;
        }

        let scenes = consolidate(load_index(&index_path)?).map_err(|_| {
            SceneError::InvalidInput(format!("{}: index file is empty", index_path.display()))
        })?;
        let frames = list_frame_files(&frame_folder)?;

        if let Some(scene) = scenes.iter().find(|scene| scene.end >= frames.len() as u64) {
            return Err(SceneError::InvalidInput(format!(
                "{}: interval {scene} is past the last of {} frame(s) in {}",
                index_path.display(),
                frames.len(),
                frame_folder.display()
            )));
        }

        let mut scene_folders = Vec::with_capacity(scenes.len());
        for (scene_index, scene) in scenes.iter().enumerate() {
            let scene_folder = output_directory
                .join(&name)
                .join(format!("Folder{}", scene_index + 1));
            fs::create_dir_all(&scene_folder)?;

            for frame in &frames[scene.start as usize..=scene.end as usize] {
                let Some(file_name) = frame.file_name() else {
                    continue;
                };
                link_frame(frame, &scene_folder.join(file_name))?;
            }

            scene_folders.push(scene_folder);
        }

        log::info!("{name}: split into {} scene folder(s)", scene_folders.len());
        report.videos.push(SplitVideo {
            name: name.clone(),
            scene_folders,
        });
        tracker.advance(&name);
    }

    Ok(report)
}

/// Link `target` at `link`, replacing whatever is already there.
fn link_frame(target: &Path, link: &Path) -> io::Result<()> {
    if fs::symlink_metadata(link).is_ok() {
        fs::remove_file(link)?;
    }

    #[cfg(unix)]
    {
        let target = fs::canonicalize(target)?;
        std::os::unix::fs::symlink(target, link)
    }

    #[cfg(not(unix))]
    {
        fs::copy(target, link).map(|_| ())
    }
}

/// Count scene folders across every video folder in `split_directory`.
pub fn count_scene_folders<P: AsRef<Path>>(split_directory: P) -> Result<usize, SceneError> {
    let mut total = 0;
    for entry in fs::read_dir(split_directory)? {
        let path = entry?.path();
        if path.is_dir() {
            total += fs::read_dir(&path)?.count();
        }
    }
    Ok(total)
}
