//! The run orchestrator.
//!
//! [`Sifter`] drives the whole pipeline: it discovers the library's leaf
//! folders, and for each one runs Discover → Probe → Allocate → Extract →
//! Report. Folders, videos, and sample points are all processed
//! sequentially, in sorted order; within one video, sample points are
//! extracted in increasing order because output file names carry an ordinal
//! counter.
//!
//! Failure handling follows the partial-tolerance rule: a probe failure
//! drops only that video, an extraction failure drops only that sample
//! point, and a folder with no usable videos is reported with zero counts.
//! Only configuration errors (unknown strategy, bad parameters, unreadable
//! input root) and cancellation abort a run.

use std::path::PathBuf;

use crate::allocator::{self, AllocationPlan, VideoDescriptor};
use crate::config::{RunOptions, SiftConfig};
use crate::error::SiftError;
use crate::progress::{OperationType, ProgressTracker};
use crate::report::{ExtractionResult, FolderReport, RunReport, VideoReport};
use crate::source::FrameSource;
use crate::walker::{self, LeafFolder};

/// One unit of allocation work: a leaf folder and its probed videos.
#[derive(Debug, Clone)]
pub struct FolderTask {
    /// Folder name, used for output naming.
    pub name: String,
    /// Folder path.
    pub path: PathBuf,
    /// Valid descriptors, in sorted file-name order.
    pub videos: Vec<VideoDescriptor>,
}

/// Drives discovery, probing, allocation, and extraction for a whole
/// library.
///
/// Generic over the [`FrameSource`] so tests can substitute a mock; real
/// runs use [`FfmpegFrameSource`](crate::FfmpegFrameSource).
///
/// # Example
///
/// ```no_run
/// use stillsift::{FfmpegFrameSource, SiftConfig, Sifter, Strategy};
///
/// let config = SiftConfig::new(
///     "holidays",
///     "holiday-shots",
///     Strategy::MaxPerFolder { cap: 24 },
/// );
/// let sifter = Sifter::new(config, FfmpegFrameSource::new())?;
/// let report = sifter.run()?;
/// println!("Wrote {} screenshot(s)", report.extracted());
/// # Ok::<(), stillsift::SiftError>(())
/// ```
pub struct Sifter<S: FrameSource> {
    config: SiftConfig,
    options: RunOptions,
    source: S,
}

impl<S: FrameSource> Sifter<S> {
    /// Create a sifter with default [`RunOptions`].
    ///
    /// # Errors
    ///
    /// Returns configuration validation errors (see
    /// [`SiftConfig::validate`]) — nothing is processed until `run`.
    pub fn new(config: SiftConfig, source: S) -> Result<Self, SiftError> {
        Self::with_options(config, source, RunOptions::default())
    }

    /// Create a sifter with explicit [`RunOptions`].
    ///
    /// # Errors
    ///
    /// Same as [`Sifter::new`].
    pub fn with_options(
        config: SiftConfig,
        source: S,
        options: RunOptions,
    ) -> Result<Self, SiftError> {
        config.validate()?;
        Ok(Self {
            config,
            options,
            source,
        })
    }

    /// Process every leaf folder of the library and return the aggregated
    /// report.
    ///
    /// # Errors
    ///
    /// - [`SiftError::InputFolder`] if the library root cannot be listed.
    /// - [`SiftError::Cancelled`] if the cancellation token fires.
    /// - [`SiftError::Io`] if an output directory cannot be created.
    ///
    /// Per-video and per-sample-point failures do not produce an `Err`;
    /// they are recorded in the returned [`RunReport`].
    pub fn run(&self) -> Result<RunReport, SiftError> {
        let folders = walker::discover_leaf_folders(&self.config.input_root)?;
        log::info!(
            "Processing {} folder(s) under {} with strategy {}",
            folders.len(),
            self.config.input_root.display(),
            self.config.strategy,
        );

        let mut report = RunReport::default();
        for folder in &folders {
            report.folders.push(self.process_folder(folder)?);
        }

        log::info!(
            "Run complete: {} screenshot(s), {} failure(s)",
            report.extracted(),
            report.failed(),
        );
        Ok(report)
    }

    /// Run one folder through Probe → Allocate → Extract → Report.
    fn process_folder(&self, folder: &LeafFolder) -> Result<FolderReport, SiftError> {
        let mut report = FolderReport {
            folder: folder.name.clone(),
            path: folder.path.clone(),
            ..FolderReport::default()
        };

        let task = self.probe_folder(folder, &mut report)?;
        if task.videos.is_empty() {
            log::info!(
                "No usable videos in {}; reporting zero counts",
                folder.path.display()
            );
            return Ok(report);
        }

        let plan = match allocator::allocate(&task.videos, &self.config.strategy) {
            Ok(plan) => plan,
            // Zero total duration leaves nothing to allocate; the folder is
            // reported, not failed.
            Err(SiftError::EmptyInput) => {
                log::info!("Nothing to allocate in {}", folder.path.display());
                return Ok(report);
            }
            Err(error) => return Err(error),
        };

        self.extract_plan(&task, &plan, &mut report)?;

        log::info!(
            "Folder '{}': {}/{} screenshot(s) extracted",
            folder.name,
            report.extracted(),
            report.planned(),
        );
        Ok(report)
    }

    /// Probe every video file in the folder, dropping the ones that fail.
    fn probe_folder(
        &self,
        folder: &LeafFolder,
        report: &mut FolderReport,
    ) -> Result<FolderTask, SiftError> {
        let files = walker::list_video_files(&folder.path)?;
        let mut videos = Vec::with_capacity(files.len());

        let mut tracker = ProgressTracker::new(
            self.options.progress.clone(),
            OperationType::Probing,
            Some(files.len() as u64),
            self.options.batch_size,
        );

        for file in files {
            if self.options.is_cancelled() {
                return Err(SiftError::Cancelled);
            }
            tracker.advance(Some(file.clone()));

            match self.source.probe(&file) {
                Ok(probe) => {
                    let descriptor =
                        VideoDescriptor::new(&file, probe.duration, probe.frame_count);
                    if descriptor.is_valid() {
                        videos.push(descriptor);
                    } else {
                        log::warn!(
                            "{} probed with empty metadata; excluding",
                            file.display()
                        );
                        report
                            .probe_failures
                            .push((file, "zero duration or frame count".to_string()));
                    }
                }
                Err(error) => {
                    log::warn!("Could not probe {}: {error}", file.display());
                    report.probe_failures.push((file, error.to_string()));
                }
            }
        }

        tracker.finish();
        Ok(FolderTask {
            name: folder.name.clone(),
            path: folder.path.clone(),
            videos,
        })
    }

    /// Materialise every sample point of the plan as a JPEG file.
    fn extract_plan(
        &self,
        task: &FolderTask,
        plan: &AllocationPlan,
        report: &mut FolderReport,
    ) -> Result<(), SiftError> {
        let output_dir = self.config.output_root.join(&task.name);
        if plan.total_points() > 0 {
            std::fs::create_dir_all(&output_dir)?;
        }

        let mut tracker = ProgressTracker::new(
            self.options.progress.clone(),
            OperationType::FrameExtraction,
            Some(plan.total_points() as u64),
            self.options.batch_size,
        );

        for allocation in &plan.allocations {
            let mut video_report = VideoReport {
                video: allocation.video.clone(),
                skipped: allocation.skipped,
                results: Vec::new(),
            };

            let stem = allocation
                .video
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| "video".to_string());

            for (ordinal, point) in allocation.points.iter().enumerate() {
                if self.options.is_cancelled() {
                    return Err(SiftError::Cancelled);
                }

                let output =
                    output_dir.join(format!("{}_{}_frame_{:04}.jpg", task.name, stem, ordinal));

                let error = match self.source.extract_frame(&allocation.video, point, &output) {
                    Ok(()) => None,
                    Err(error) => {
                        log::warn!(
                            "Failed to extract {point} of {}: {error}",
                            allocation.video.display()
                        );
                        Some(error.to_string())
                    }
                };

                video_report.results.push(ExtractionResult {
                    video: allocation.video.clone(),
                    point: *point,
                    output,
                    error,
                });
                tracker.advance(Some(allocation.video.clone()));
            }

            report.videos.push(video_report);
        }

        tracker.finish();
        Ok(())
    }
}
