//! # stillsift
//!
//! Sift representative still-frame screenshots out of folder-organised video
//! libraries.
//!
//! `stillsift` walks a library root (flat, or one level of subfolders),
//! probes each video for its duration and frame count, and extracts
//! screenshots according to an allocation strategy:
//!
//! - **`max_screenshots`** — a hard per-folder budget, split across the
//!   folder's videos proportionally to their share of the total duration.
//! - **`time_based`** — one screenshot per fixed time interval, per video,
//!   with no folder-wide cap.
//!
//! Decoding and JPEG encoding are powered by FFmpeg via the
//! [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next) crate, behind the
//! [`FrameSource`] trait so the pipeline itself never touches a decoder.
//!
//! ## Quick start
//!
//! ```no_run
//! use stillsift::{FfmpegFrameSource, SiftConfig, Sifter, Strategy};
//!
//! let config = SiftConfig::new(
//!     "/media/library",
//!     "/media/screenshots",
//!     Strategy::MaxPerFolder { cap: 40 },
//! );
//!
//! let sifter = Sifter::new(config, FfmpegFrameSource::new())?;
//! let report = sifter.run()?;
//! print!("{report}");
//! # Ok::<(), stillsift::SiftError>(())
//! ```
//!
//! ## Time-based sampling
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use stillsift::{FfmpegFrameSource, SiftConfig, Sifter, Strategy};
//!
//! // Roughly one screenshot per 30 seconds of playback, evenly re-spaced
//! // across each video.
//! let config = SiftConfig::new(
//!     "/media/library",
//!     "/media/screenshots",
//!     Strategy::TimeBased { interval: Duration::from_secs(30) },
//! );
//! let report = Sifter::new(config, FfmpegFrameSource::new())?.run()?;
//! println!("{} screenshot(s)", report.extracted());
//! # Ok::<(), stillsift::SiftError>(())
//! ```
//!
//! ## Planning without extracting
//!
//! The allocator is a pure function over probed metadata, so a plan can be
//! inspected without touching a decoder:
//!
//! ```
//! use std::time::Duration;
//!
//! use stillsift::{Strategy, VideoDescriptor, allocate};
//!
//! let videos = vec![
//!     VideoDescriptor::new("a.mp4", Duration::from_secs(20), 600),
//!     VideoDescriptor::new("b.mp4", Duration::from_secs(10), 300),
//! ];
//! let plan = allocate(&videos, &Strategy::MaxPerFolder { cap: 12 })?;
//! assert_eq!(plan.total_points(), 12);
//! # Ok::<(), stillsift::SiftError>(())
//! ```
//!
//! ## Failure model
//!
//! One bad video never aborts a batch: probe failures drop a single video,
//! extraction failures drop a single screenshot, and empty folders are
//! reported with zero counts. Everything non-fatal lands in the structured
//! [`RunReport`]. Only configuration errors (an unrecognised strategy, a bad
//! cap or interval, an unreadable input root) and cooperative cancellation
//! abort a run.
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed on your system; see the
//! README for platform-specific instructions.

pub mod allocator;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod progress;
pub mod report;
pub mod source;
pub mod strategy;
mod util;
pub mod walker;

pub use allocator::{
    AllocationPlan, SamplePoint, SkipReason, VideoAllocation, VideoDescriptor, allocate,
};
pub use config::{RunOptions, SiftConfig};
pub use error::SiftError;
pub use orchestrator::{FolderTask, Sifter};
pub use progress::{CancellationToken, OperationType, ProgressCallback, ProgressInfo};
pub use report::{ExtractionResult, FolderReport, RunReport, VideoReport};
pub use source::{
    FfmpegFrameSource, FfmpegLogLevel, FrameSource, ProbeReport, set_ffmpeg_log_level,
};
pub use strategy::Strategy;
pub use walker::{
    LeafFolder, VIDEO_EXTENSIONS, discover_leaf_folders, is_video_file, list_video_files,
};
