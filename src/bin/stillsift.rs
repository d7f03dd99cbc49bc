use std::{path::PathBuf, sync::Arc};

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use stillsift::{
    FfmpegFrameSource, FfmpegLogLevel, FrameSource, ProgressCallback, ProgressInfo, RunOptions,
    RunReport, SiftConfig, Sifter, Strategy, allocate, discover_leaf_folders, list_video_files,
};

const CLI_AFTER_HELP: &str = "Examples:\n  stillsift run library --out shots --strategy max_screenshots --cap 40 --progress\n  stillsift run library --out shots --strategy time_based --interval 30\n  stillsift plan library --strategy max_screenshots --cap 40 --json\n  stillsift probe library/holidays\n  stillsift completions zsh > _stillsift";

#[derive(Debug, Parser)]
#[command(
    name = "stillsift",
    version,
    about = "Sift representative screenshots out of folder-organised video libraries",
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
    /// Show additional logging output.
    #[arg(long)]
    verbose: bool,

    /// Show a progress bar where supported.
    #[arg(long)]
    progress: bool,

    /// FFmpeg log level (quiet, panic, fatal, error, warning, info, verbose, debug, trace).
    #[arg(long)]
    ffmpeg_log_level: Option<String>,

    /// JPEG encoder quality for written screenshots (1-100).
    #[arg(long, default_value_t = 100)]
    quality: u8,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Extract screenshots from a whole library.
    #[command(
        about = "Extract screenshots from a library",
        after_help = "Examples:\n  stillsift run library --out shots --strategy max_screenshots --cap 40\n  stillsift run library --out shots --strategy time_based --interval 12.5 --progress"
    )]
    Run {
        /// Library root (flat folder of videos, or one level of subfolders).
        input: PathBuf,
        /// Output root; one subdirectory is created per input folder.
        #[arg(long)]
        out: PathBuf,
        /// Allocation strategy: max_screenshots | time_based.
        #[arg(long)]
        strategy: String,
        /// Per-folder screenshot budget (max_screenshots strategy).
        #[arg(long)]
        cap: Option<u64>,
        /// Sampling interval in seconds (time_based strategy).
        #[arg(long)]
        interval: Option<f64>,
        /// Print the run report as machine-readable JSON.
        #[arg(long)]
        json: bool,
    },

    /// Compute and print the allocation plan without extracting anything.
    #[command(
        about = "Dry-run the allocator",
        after_help = "Examples:\n  stillsift plan library --strategy max_screenshots --cap 40\n  stillsift plan library --strategy time_based --interval 30 --json"
    )]
    Plan {
        /// Library root.
        input: PathBuf,
        /// Allocation strategy: max_screenshots | time_based.
        #[arg(long)]
        strategy: String,
        /// Per-folder screenshot budget (max_screenshots strategy).
        #[arg(long)]
        cap: Option<u64>,
        /// Sampling interval in seconds (time_based strategy).
        #[arg(long)]
        interval: Option<f64>,
        /// Print the plan as machine-readable JSON.
        #[arg(long)]
        json: bool,
    },

    /// Probe one folder's videos and print their metadata.
    #[command(
        about = "Probe a folder of videos",
        after_help = "Examples:\n  stillsift probe library/holidays\n  stillsift probe library/holidays --json"
    )]
    Probe {
        /// Folder containing video files.
        folder: PathBuf,
        /// Print probe results as machine-readable JSON.
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completion scripts.
    #[command(about = "Generate shell completions")]
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn parse_ffmpeg_log_level(value: &str) -> Option<FfmpegLogLevel> {
    match value.to_ascii_lowercase().as_str() {
        "quiet" => Some(FfmpegLogLevel::Quiet),
        "panic" => Some(FfmpegLogLevel::Panic),
        "fatal" => Some(FfmpegLogLevel::Fatal),
        "error" => Some(FfmpegLogLevel::Error),
        "warning" | "warn" => Some(FfmpegLogLevel::Warning),
        "info" => Some(FfmpegLogLevel::Info),
        "verbose" => Some(FfmpegLogLevel::Verbose),
        "debug" => Some(FfmpegLogLevel::Debug),
        "trace" => Some(FfmpegLogLevel::Trace),
        _ => None,
    }
}

fn apply_global_options(global: &GlobalOptions) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(level) = &global.ffmpeg_log_level {
        let parsed = parse_ffmpeg_log_level(level)
            .ok_or(format!("unsupported --ffmpeg-log-level: {level}"))?;
        stillsift::set_ffmpeg_log_level(parsed);
    }

    if !(1..=100).contains(&global.quality) {
        return Err("--quality must be between 1 and 100".into());
    }

    Ok(())
}

/// Bridges library progress callbacks onto an indicatif bar.
///
/// Totals are per folder, so the bar length is re-set whenever a new folder
/// starts reporting.
struct TerminalProgress {
    bar: ProgressBar,
}

impl TerminalProgress {
    fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let bar = ProgressBar::no_length();
        let style =
            ProgressStyle::with_template("{spinner:.green} {bar:40.cyan/blue} {pos}/{len} {msg}")?;
        bar.set_style(style.progress_chars("##-"));
        Ok(Self { bar })
    }
}

impl ProgressCallback for TerminalProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        if let Some(total) = info.total {
            self.bar.set_length(total);
        }
        self.bar.set_position(info.current);
        if let Some(video) = &info.current_video {
            if let Some(name) = video.file_name() {
                self.bar.set_message(name.to_string_lossy().into_owned());
            }
        }
    }
}

fn report_to_json(report: &RunReport) -> serde_json::Value {
    json!({
        "folders": report.folders.iter().map(|folder| json!({
            "folder": folder.folder,
            "path": folder.path,
            "planned": folder.planned(),
            "extracted": folder.extracted(),
            "failed": folder.failed(),
            "videos": folder.videos.iter().map(|video| json!({
                "video": video.video,
                "planned": video.planned(),
                "extracted": video.extracted(),
                "skipped": video.skipped.map(|reason| reason.to_string()),
            })).collect::<Vec<_>>(),
            "probe_failures": folder.probe_failures.iter().map(|(path, reason)| json!({
                "video": path,
                "reason": reason,
            })).collect::<Vec<_>>(),
        })).collect::<Vec<_>>(),
        "total_extracted": report.extracted(),
        "total_failed": report.failed(),
        "unreadable_videos": report.probe_failures(),
    })
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    apply_global_options(&cli.global)?;

    match cli.command {
        Commands::Run {
            input,
            out,
            strategy,
            cap,
            interval,
            json,
        } => {
            // An unrecognised strategy aborts here, before any folder is
            // touched.
            let strategy = Strategy::parse(&strategy, cap, interval)?;
            let config = SiftConfig::new(input, out, strategy);

            let mut options = RunOptions::new();
            if cli.global.progress {
                options = options.with_progress(Arc::new(TerminalProgress::new()?));
            }

            let source = FfmpegFrameSource::new().with_jpeg_quality(cli.global.quality);
            let sifter = Sifter::with_options(config, source, options)?;
            let report = sifter.run()?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report_to_json(&report))?);
            } else {
                if cli.global.verbose {
                    print!("{report}");
                }
                println!(
                    "{} {}",
                    "success:".green().bold(),
                    format!(
                        "Extracted {} screenshot(s) across {} folder(s)",
                        report.extracted(),
                        report.folders.len()
                    )
                    .green()
                );
                if report.failed() > 0 || report.probe_failures() > 0 {
                    eprintln!(
                        "{} {}",
                        "warning:".yellow().bold(),
                        format!(
                            "{} extraction failure(s), {} unreadable video(s)",
                            report.failed(),
                            report.probe_failures()
                        )
                        .yellow()
                    );
                }
            }
        }
        Commands::Plan {
            input,
            strategy,
            cap,
            interval,
            json,
        } => {
            let strategy = Strategy::parse(&strategy, cap, interval)?;
            let source = FfmpegFrameSource::new();

            let mut folder_plans = Vec::new();
            for folder in discover_leaf_folders(&input)? {
                let mut videos = Vec::new();
                for file in list_video_files(&folder.path)? {
                    match source.probe(&file) {
                        Ok(probe) => videos.push(stillsift::VideoDescriptor::new(
                            &file,
                            probe.duration,
                            probe.frame_count,
                        )),
                        Err(error) => eprintln!(
                            "{} {}",
                            "warning:".yellow().bold(),
                            format!("{error}").yellow()
                        ),
                    }
                }

                let plan = match allocate(&videos, &strategy) {
                    Ok(plan) => plan,
                    Err(stillsift::SiftError::EmptyInput) => Default::default(),
                    Err(error) => return Err(error.into()),
                };
                folder_plans.push((folder, plan));
            }

            if json {
                let payload: Vec<_> = folder_plans
                    .iter()
                    .map(|(folder, plan)| {
                        json!({
                            "folder": folder.name,
                            "total_points": plan.total_points(),
                            "videos": plan.allocations.iter().map(|allocation| json!({
                                "video": allocation.video,
                                "points": allocation.points.iter().map(|point| point.to_string()).collect::<Vec<_>>(),
                                "skipped": allocation.skipped.map(|reason| reason.to_string()),
                            })).collect::<Vec<_>>(),
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                for (folder, plan) in &folder_plans {
                    println!(
                        "{} -> {} screenshot(s)",
                        folder.name.bold(),
                        plan.total_points()
                    );
                    for allocation in &plan.allocations {
                        match allocation.skipped {
                            Some(reason) => println!(
                                "  {} {} ({reason})",
                                "skip".yellow(),
                                allocation.video.display()
                            ),
                            None => println!(
                                "  {} {} ({} point(s))",
                                "take".green(),
                                allocation.video.display(),
                                allocation.points.len()
                            ),
                        }
                    }
                }
            }
        }
        Commands::Probe { folder, json } => {
            let source = FfmpegFrameSource::new();
            let files = list_video_files(&folder)?;

            if json {
                let payload: Vec<_> = files
                    .iter()
                    .map(|file| match source.probe(file) {
                        Ok(probe) => json!({
                            "video": file,
                            "duration_seconds": probe.duration.as_secs_f64(),
                            "frame_count": probe.frame_count,
                            "fps": probe.frames_per_second,
                        }),
                        Err(error) => json!({
                            "video": file,
                            "error": error.to_string(),
                        }),
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                for file in &files {
                    match source.probe(file) {
                        Ok(probe) => println!(
                            "{}: {:.2}s, {} frames @ {:.2} fps",
                            file.display(),
                            probe.duration.as_secs_f64(),
                            probe.frame_count,
                            probe.frames_per_second,
                        ),
                        Err(error) => {
                            eprintln!("{} {error}", "error:".red().bold());
                        }
                    }
                }
            }
        }
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "stillsift", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::parse_ffmpeg_log_level;
    use stillsift::{SiftError, Strategy};

    #[test]
    fn parse_ffmpeg_log_level_aliases() {
        assert!(parse_ffmpeg_log_level("quiet").is_some());
        assert!(parse_ffmpeg_log_level("WARN").is_some());
        assert!(parse_ffmpeg_log_level("warning").is_some());
        assert!(parse_ffmpeg_log_level("loud").is_none());
    }

    #[test]
    fn strategy_names_match_cli_surface() {
        assert!(Strategy::parse("max_screenshots", Some(10), None).is_ok());
        assert!(Strategy::parse("time_based", None, Some(5.0)).is_ok());
        assert!(matches!(
            Strategy::parse("every_scene", Some(10), Some(5.0)),
            Err(SiftError::InvalidStrategy(_))
        ));
    }
}
