use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use sceneslice::{
    Detection, HistogramDetector, ProgressCallback, ProgressInfo, SegmentationOptions,
    consolidate, load_index, plan_windows, save_index,
};

const CLI_AFTER_HELP: &str = "Examples:\n  sceneslice extract-frames videos --out frames --progress\n  sceneslice split-index frames --out split_idx --range 1500 --threshold 0.5\n  sceneslice split-frames --frame-dir frames --idx-dir split_idx --out split_frames\n  sceneslice stats split_frames\n  sceneslice completions zsh > _sceneslice";

#[derive(Debug, Parser)]
#[command(
    name = "sceneslice",
    version,
    about = "Split videos into scene clips with windowed shot-boundary detection",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Parser, Clone, Default)]
struct GlobalOptions {
    /// Show debug logging output (RUST_LOG overrides).
    #[arg(long, global = true)]
    verbose: bool,

    /// Show a progress bar for batch commands.
    #[arg(long, global = true)]
    progress: bool,

    /// Allow writing into existing output files and directories.
    #[arg(long, global = true)]
    overwrite: bool,

    /// Worker thread count for parallel window detection.
    #[arg(long, global = true)]
    threads: Option<usize>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Decode every video in a directory into a folder of small frames.
    #[command(
        about = "Decode videos into frame folders",
        after_help = "Examples:\n  sceneslice extract-frames videos --out frames"
    )]
    ExtractFrames {
        /// Directory of video files.
        input: PathBuf,
        /// Output directory; one frame folder per video.
        #[arg(long)]
        out: PathBuf,
        /// Frame width in pixels.
        #[arg(long, default_value_t = sceneslice::DETECTOR_FRAME_WIDTH)]
        width: u32,
        /// Frame height in pixels.
        #[arg(long, default_value_t = sceneslice::DETECTOR_FRAME_HEIGHT)]
        height: u32,
    },

    /// Detect scenes for every video and write one index file per video.
    #[command(
        about = "Write scene index files",
        after_help = "Examples:\n  sceneslice split-index frames --out split_idx\n  sceneslice split-index frames --out split_idx --detector precomputed --predictions scores --json"
    )]
    SplitIndex {
        /// Directory of frame folders and/or video files.
        input: PathBuf,
        /// Output directory for `<video>.txt` index files.
        #[arg(long)]
        out: PathBuf,
        /// Boundary probability threshold.
        #[arg(long, default_value_t = sceneslice::DEFAULT_THRESHOLD)]
        threshold: f64,
        /// Maximum frames per detector window.
        #[arg(long, default_value_t = sceneslice::DEFAULT_WINDOW_CAPACITY)]
        range: u64,
        /// Detector: histogram | precomputed.
        #[arg(long, default_value = "histogram")]
        detector: String,
        /// Directory of `<video>.txt` probability files (precomputed detector).
        #[arg(long)]
        predictions: Option<PathBuf>,
        /// Luminance histogram bins (histogram detector).
        #[arg(long, default_value_t = 64)]
        bins: usize,
        /// Skip videos whose windows need more frame memory than this.
        #[arg(long)]
        max_window_bytes: Option<u64>,
        /// Print the batch summary as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Consolidate an index file into non-nested, sorted intervals.
    #[command(about = "Consolidate an index file")]
    Consolidate {
        /// Index file(s) for the same video; their intervals are merged.
        #[arg(required = true)]
        index: Vec<PathBuf>,
        /// Write the result here instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Link frames into one folder per consolidated scene.
    #[command(
        about = "Split frame folders into scene folders",
        after_help = "Examples:\n  sceneslice split-frames --frame-dir frames --idx-dir split_idx --out split_frames"
    )]
    SplitFrames {
        /// Directory of frame folders.
        #[arg(long)]
        frame_dir: PathBuf,
        /// Directory of `<video>.txt` index files.
        #[arg(long)]
        idx_dir: PathBuf,
        /// Output directory.
        #[arg(long)]
        out: PathBuf,
    },

    /// Print the detector windows planned for a frame count.
    #[command(about = "Show the window plan")]
    Windows {
        /// Total number of frames.
        total_frames: u64,
        /// Maximum frames per window.
        #[arg(long, default_value_t = sceneslice::DEFAULT_WINDOW_CAPACITY)]
        range: u64,
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Count scene folders in a split-frames output directory.
    #[command(about = "Count scene folders")]
    Stats {
        /// Output directory of `split-frames`.
        input: PathBuf,
    },

    /// Generate shell completion scripts.
    #[command(about = "Generate shell completions")]
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn parse_detection(
    name: &str,
    predictions: Option<PathBuf>,
    bins: usize,
) -> Result<Detection, Box<dyn std::error::Error>> {
    match name.to_ascii_lowercase().as_str() {
        "histogram" | "hist" => Ok(Detection::Histogram(HistogramDetector::new(bins))),
        "precomputed" | "file" => {
            let directory =
                predictions.ok_or("--detector precomputed requires --predictions <DIR>")?;
            Ok(Detection::Precomputed { directory })
        }
        other => Err(format!("unsupported --detector: {other} (histogram|precomputed)").into()),
    }
}

fn ensure_writable_path(path: &Path, overwrite: bool) -> Result<(), Box<dyn std::error::Error>> {
    if path.exists() {
        if overwrite {
            eprintln!(
                "{} {}",
                "warning:".yellow().bold(),
                format!("writing into existing {}", path.display()).yellow()
            );
        } else {
            return Err(format!(
                "output already exists: {} (use --overwrite to replace)",
                path.display()
            )
            .into());
        }
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn apply_global_options(global: &GlobalOptions) {
    init_logging(global.verbose);

    if let Some(threads) = global.threads
        && threads > 0
    {
        unsafe {
            std::env::set_var("RAYON_NUM_THREADS", threads.to_string());
        }
    }

    if cfg!(not(feature = "rayon")) && global.threads.is_some() {
        eprintln!(
            "{} {}",
            "warning:".yellow().bold(),
            "--threads requires building with the `rayon` feature".yellow()
        );
    }
}

/// Drives an indicatif bar from batch progress callbacks.
struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::with_template(
            "{spinner:.green} {bar:40.cyan/blue} {pos}/{len} {msg}",
        )?;
        bar.set_style(style.progress_chars("##-"));
        Ok(Self { bar })
    }
}

impl ProgressCallback for BarProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        if let Some(total) = info.total {
            self.bar.set_length(total);
        }
        self.bar.set_position(info.current);
        if let Some(item) = &info.current_item {
            self.bar.set_message(item.clone());
        }
    }
}

fn base_options(
    global: &GlobalOptions,
) -> Result<(SegmentationOptions, Option<ProgressBar>), Box<dyn std::error::Error>> {
    let mut options = SegmentationOptions::new();
    let mut bar = None;
    if global.progress {
        let progress = BarProgress::new()?;
        bar = Some(progress.bar.clone());
        options = options.with_progress(Arc::new(progress));
    }
    Ok((options, bar))
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    apply_global_options(&cli.global);

    match cli.command {
        Commands::ExtractFrames {
            input,
            out,
            width,
            height,
        } => {
            ensure_writable_path(&out, cli.global.overwrite)?;
            fs::create_dir_all(&out)?;

            let (options, bar) = base_options(&cli.global)?;
            let options = options.with_frame_size(width, height);
            options.validate()?;
            let report = sceneslice::extract_all_frames(&input, &out, &options)?;
            if let Some(bar) = bar {
                bar.finish_with_message("done");
            }

            for (name, error) in &report.failed {
                eprintln!("{} {name}: {error}", "failed:".red().bold());
            }
            let total: u64 = report.extracted.iter().map(|(_, count)| count).sum();
            println!(
                "{} {}",
                "success:".green().bold(),
                format!(
                    "Extracted {total} frame(s) from {} video(s) to {}",
                    report.extracted.len(),
                    out.display()
                )
                .green()
            );
        }
        Commands::SplitIndex {
            input,
            out,
            threshold,
            range,
            detector,
            predictions,
            bins,
            max_window_bytes,
            json,
        } => {
            let detection = parse_detection(&detector, predictions, bins)?;
            ensure_writable_path(&out, cli.global.overwrite)?;

            let (options, bar) = base_options(&cli.global)?;
            let mut options = options
                .with_threshold(threshold)
                .with_window_capacity(range);
            if let Some(bytes) = max_window_bytes {
                options = options.with_max_window_bytes(bytes);
            }

            let report = sceneslice::run_batch(&input, &out, &detection, &options)?;
            if let Some(bar) = bar {
                bar.finish_with_message("done");
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&report.to_json())?);
            } else {
                print!("{report}");
                if !report.is_complete() {
                    eprintln!(
                        "{} {}",
                        "warning:".yellow().bold(),
                        format!("{} video(s) skipped", report.skipped.len()).yellow()
                    );
                }
                println!("{} {}", "saved".green().bold(), out.display());
            }
        }
        Commands::Consolidate { index, out } => {
            let mut intervals = Vec::new();
            for path in &index {
                intervals.extend(load_index(path)?);
            }
            let scenes = consolidate(intervals)?;

            match out {
                Some(path) => {
                    ensure_writable_path(&path, cli.global.overwrite)?;
                    save_index(&path, &scenes)?;
                    println!("{} {}", "saved".green().bold(), path.display());
                }
                None => {
                    for scene in &scenes {
                        println!("{scene}");
                    }
                }
            }
        }
        Commands::SplitFrames {
            frame_dir,
            idx_dir,
            out,
        } => {
            if out.exists() && !cli.global.overwrite {
                return Err(format!(
                    "output directory already exists: {} (use --overwrite)",
                    out.display()
                )
                .into());
            }

            let (options, bar) = base_options(&cli.global)?;
            let report = sceneslice::split_frames(&frame_dir, &idx_dir, &out, &options)?;
            if let Some(bar) = bar {
                bar.finish_with_message("done");
            }

            for name in &report.missing_index {
                eprintln!(
                    "{} {}",
                    "warning:".yellow().bold(),
                    format!("no index file for {name}").yellow()
                );
            }
            println!(
                "{} {}",
                "success:".green().bold(),
                format!(
                    "Created {} scene folder(s) for {} video(s) in {}",
                    report.scene_count(),
                    report.videos.len(),
                    out.display()
                )
                .green()
            );
        }
        Commands::Windows {
            total_frames,
            range,
            json,
        } => {
            let windows = plan_windows(total_frames, range)?;
            if json {
                let payload: Vec<_> = windows
                    .iter()
                    .map(|window| json!({ "start": window.start, "end": window.end }))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                for window in &windows {
                    println!("{} {}", window.start, window.end);
                }
            }
        }
        Commands::Stats { input } => {
            println!("{}", sceneslice::count_scene_folders(&input)?);
        }
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "sceneslice", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("{} {error}", "error:".red().bold());
        std::process::exit(1);
    }
}
