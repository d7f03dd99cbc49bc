//! Structured run reporting.
//!
//! Every non-fatal failure in a run — a video that would not probe, a sample
//! point that would not extract, a folder with nothing in it — surfaces here
//! rather than as an `Err` from [`Sifter::run`](crate::Sifter::run), so one
//! bad video never aborts a multi-folder batch. The report preserves
//! traceability from each written screenshot back to its source video and
//! sample point.
//!
//! # Example
//!
//! ```no_run
//! use stillsift::{FfmpegFrameSource, SiftConfig, Sifter, Strategy};
//!
//! let config = SiftConfig::new(
//!     "library",
//!     "shots",
//!     Strategy::MaxPerFolder { cap: 40 },
//! );
//! let report = Sifter::new(config, FfmpegFrameSource::new())?.run()?;
//! print!("{report}");
//! # Ok::<(), stillsift::SiftError>(())
//! ```

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::PathBuf;

use crate::allocator::{SamplePoint, SkipReason};

/// Outcome of materialising one sample point.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionResult {
    /// Source video.
    pub video: PathBuf,
    /// The sample point that was extracted (or attempted).
    pub point: SamplePoint,
    /// Where the screenshot was written (or would have been).
    pub output: PathBuf,
    /// `None` on success, otherwise the failure reason.
    pub error: Option<String>,
}

impl ExtractionResult {
    /// Returns `true` if the screenshot was written.
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Per-video outcome within one folder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoReport {
    /// Path of the video.
    pub video: PathBuf,
    /// Why the allocator gave this video zero points, if it did.
    pub skipped: Option<SkipReason>,
    /// One entry per planned sample point, in extraction order.
    pub results: Vec<ExtractionResult>,
}

impl VideoReport {
    /// Sample points the allocator planned for this video.
    pub fn planned(&self) -> usize {
        self.results.len()
    }

    /// Screenshots actually written.
    pub fn extracted(&self) -> usize {
        self.results.iter().filter(|result| result.succeeded()).count()
    }

    /// Sample points that failed to materialise.
    pub fn failed(&self) -> usize {
        self.planned() - self.extracted()
    }
}

/// Outcome of processing one leaf folder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FolderReport {
    /// Folder name (drives output naming).
    pub folder: String,
    /// Folder path.
    pub path: PathBuf,
    /// Per-video outcomes, in allocation order.
    pub videos: Vec<VideoReport>,
    /// Videos dropped before allocation because probing failed, with the
    /// probe failure reason.
    pub probe_failures: Vec<(PathBuf, String)>,
}

impl FolderReport {
    /// Total sample points planned across the folder.
    pub fn planned(&self) -> usize {
        self.videos.iter().map(VideoReport::planned).sum()
    }

    /// Total screenshots written across the folder.
    pub fn extracted(&self) -> usize {
        self.videos.iter().map(VideoReport::extracted).sum()
    }

    /// Total sample points that failed across the folder.
    pub fn failed(&self) -> usize {
        self.videos.iter().map(VideoReport::failed).sum()
    }
}

/// Aggregated outcome of a whole run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    /// One report per processed leaf folder, in processing order.
    pub folders: Vec<FolderReport>,
}

impl RunReport {
    /// Total screenshots written across all folders.
    pub fn extracted(&self) -> usize {
        self.folders.iter().map(FolderReport::extracted).sum()
    }

    /// Total sample points that failed across all folders.
    pub fn failed(&self) -> usize {
        self.folders.iter().map(FolderReport::failed).sum()
    }

    /// Total videos dropped due to probe failures.
    pub fn probe_failures(&self) -> usize {
        self.folders
            .iter()
            .map(|folder| folder.probe_failures.len())
            .sum()
    }
}

impl Display for RunReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for folder in &self.folders {
            writeln!(
                f,
                "{}: {} screenshot(s) from {} video(s)",
                folder.folder,
                folder.extracted(),
                folder.videos.len(),
            )?;

            for video in &folder.videos {
                if let Some(reason) = video.skipped {
                    writeln!(f, "  [SKIP] {} ({reason})", video.video.display())?;
                } else {
                    writeln!(
                        f,
                        "  [OK]   {} ({}/{} extracted)",
                        video.video.display(),
                        video.extracted(),
                        video.planned(),
                    )?;
                }

                for result in &video.results {
                    if let Some(error) = &result.error {
                        writeln!(f, "  [FAIL] {} at {}: {error}", video.video.display(), result.point)?;
                    }
                }
            }

            for (path, reason) in &folder.probe_failures {
                writeln!(f, "  [FAIL] {} could not be probed: {reason}", path.display())?;
            }
        }

        writeln!(
            f,
            "Total: {} screenshot(s), {} failure(s), {} unreadable video(s)",
            self.extracted(),
            self.failed(),
            self.probe_failures(),
        )?;
        Ok(())
    }
}
