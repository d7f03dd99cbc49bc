//! Screenshot allocation.
//!
//! Given the probed videos of one folder and a [`Strategy`], the allocator
//! decides how many screenshots each video gets and at which frame indices or
//! timestamps, producing an [`AllocationPlan`]. Allocation is pure and
//! stateless: it never touches the filesystem, never mutates its inputs, and
//! is deterministic for identical inputs, so independent folders can be
//! planned concurrently even though the orchestrator runs them sequentially.
//!
//! # The proportional-budget rule
//!
//! Under [`Strategy::MaxPerFolder`] each video's share of the folder budget
//! is `floor(duration / total_duration * cap)`. Two consequences are
//! deliberate and preserved from the tool this crate grew out of:
//!
//! - A video whose share floors to zero is skipped outright, rather than
//!   being guaranteed a minimum of one screenshot. Short clips in a folder
//!   of long videos simply do not make the cut.
//! - The running total is capped at `cap` in input order, so when the budget
//!   is tight, videos earlier in the listing are favoured and later ones may
//!   be truncated or skipped. Callers that care about which videos win
//!   should order the input accordingly (the orchestrator sorts listings by
//!   file name for reproducibility).

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::SiftError;
use crate::strategy::Strategy;

/// Immutable description of one probed video.
///
/// Built from a [`FrameSource`](crate::FrameSource) probe. Descriptors with
/// a zero duration or frame count are invalid and must be excluded before
/// allocation; [`VideoDescriptor::is_valid`] checks this.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoDescriptor {
    /// Path of the video file.
    pub path: PathBuf,
    /// Total playback duration.
    pub duration: Duration,
    /// Total number of frames.
    pub frame_count: u64,
}

impl VideoDescriptor {
    /// Create a descriptor from probe results.
    pub fn new(path: impl Into<PathBuf>, duration: Duration, frame_count: u64) -> Self {
        Self {
            path: path.into(),
            duration,
            frame_count,
        }
    }

    /// Returns `true` if the descriptor carries usable metadata.
    ///
    /// Videos with a zero duration or frame count cannot be sampled and are
    /// dropped before allocation.
    pub fn is_valid(&self) -> bool {
        !self.duration.is_zero() && self.frame_count > 0
    }
}

/// A single target position at which one screenshot is produced.
///
/// The variant is chosen per strategy: proportional budgeting samples by
/// frame index, time-based sampling by timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SamplePoint {
    /// Zero-based frame index, always `< frame_count`.
    Frame(u64),
    /// Timestamp from the start of the video, always `< duration`.
    Timestamp(Duration),
}

impl Display for SamplePoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            SamplePoint::Frame(number) => write!(f, "frame {number}"),
            SamplePoint::Timestamp(timestamp) => {
                write!(f, "{:.3}s", timestamp.as_secs_f64())
            }
        }
    }
}

/// Why a video received zero sample points.
///
/// Carried in the plan so skipped videos are reported rather than silently
/// dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The video's proportional share of the folder budget floored to zero.
    ZeroShare,
    /// The video is shorter than the configured sampling interval.
    ShorterThanInterval,
    /// The folder budget was exhausted by earlier videos.
    CapReached,
}

impl Display for SkipReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            SkipReason::ZeroShare => write!(f, "proportional share rounds to zero"),
            SkipReason::ShorterThanInterval => write!(f, "too short for interval"),
            SkipReason::CapReached => write!(f, "folder budget already spent"),
        }
    }
}

/// The sample points allocated to one video.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoAllocation {
    /// Path of the video this allocation belongs to.
    pub video: PathBuf,
    /// Ordered, strictly increasing sample points. Empty when skipped.
    pub points: Vec<SamplePoint>,
    /// Set when the video received zero points on purpose.
    pub skipped: Option<SkipReason>,
}

/// The allocator's output for one folder: one entry per input video, in
/// input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AllocationPlan {
    /// Per-video allocations, in the same order as the input descriptors.
    pub allocations: Vec<VideoAllocation>,
}

impl AllocationPlan {
    /// Total sample points across all videos in the plan.
    pub fn total_points(&self) -> usize {
        self.allocations
            .iter()
            .map(|allocation| allocation.points.len())
            .sum()
    }

    /// Number of videos that were skipped entirely.
    pub fn skipped_count(&self) -> usize {
        self.allocations
            .iter()
            .filter(|allocation| allocation.skipped.is_some())
            .count()
    }
}

/// Compute an [`AllocationPlan`] for one folder of videos.
///
/// Inputs are read-only; the returned plan is freshly owned and retains no
/// reference to the descriptors. Descriptors must already be valid (see
/// [`VideoDescriptor::is_valid`]) — the orchestrator filters out probe
/// failures and zero-metadata videos before calling this.
///
/// # Errors
///
/// - [`SiftError::EmptyInput`] under [`Strategy::MaxPerFolder`] when the
///   video list is empty or the total duration is zero. `time_based` has no
///   such precondition: an empty list yields an empty plan.
/// - [`SiftError::InvalidCap`] / [`SiftError::InvalidInterval`] if the
///   strategy parameters are out of range (normally caught earlier by
///   configuration validation).
pub fn allocate(
    videos: &[VideoDescriptor],
    strategy: &Strategy,
) -> Result<AllocationPlan, SiftError> {
    strategy.validate()?;

    match strategy {
        Strategy::MaxPerFolder { cap } => allocate_proportional(videos, *cap),
        Strategy::TimeBased { interval } => Ok(allocate_time_based(videos, *interval)),
    }
}

/// Proportional split of a hard folder budget.
fn allocate_proportional(
    videos: &[VideoDescriptor],
    cap: u64,
) -> Result<AllocationPlan, SiftError> {
    let total_duration: f64 = videos
        .iter()
        .map(|video| video.duration.as_secs_f64())
        .sum();

    if videos.is_empty() || total_duration <= 0.0 {
        return Err(SiftError::EmptyInput);
    }

    let mut plan = AllocationPlan::default();
    let mut allocated: u64 = 0;

    for video in videos {
        if allocated >= cap {
            log::debug!(
                "Budget spent ({allocated}/{cap}); skipping {}",
                video.path.display()
            );
            plan.allocations.push(VideoAllocation {
                video: video.path.clone(),
                points: Vec::new(),
                skipped: Some(SkipReason::CapReached),
            });
            continue;
        }

        let share = ((video.duration.as_secs_f64() / total_duration) * cap as f64).floor() as u64;
        if share == 0 {
            plan.allocations.push(VideoAllocation {
                video: video.path.clone(),
                points: Vec::new(),
                skipped: Some(SkipReason::ZeroShare),
            });
            continue;
        }

        // The floored shares can never sum past the cap, but clamping to the
        // remainder keeps the invariant independent of float rounding.
        let share = share.min(cap - allocated);
        let points = frame_points(video.frame_count, share);
        allocated += points.len() as u64;

        plan.allocations.push(VideoAllocation {
            video: video.path.clone(),
            points,
            skipped: None,
        });
    }

    Ok(plan)
}

/// Fixed-interval sampling with no folder-wide cap.
fn allocate_time_based(videos: &[VideoDescriptor], interval: Duration) -> AllocationPlan {
    let mut plan = AllocationPlan::default();

    for video in videos {
        if video.duration < interval {
            log::debug!(
                "{} is shorter than the {:.2}s interval; skipping",
                video.path.display(),
                interval.as_secs_f64()
            );
            plan.allocations.push(VideoAllocation {
                video: video.path.clone(),
                points: Vec::new(),
                skipped: Some(SkipReason::ShorterThanInterval),
            });
            continue;
        }

        let duration = video.duration.as_secs_f64();
        let count = (duration / interval.as_secs_f64()).floor() as u64;

        // Re-space the samples evenly across the whole duration rather than
        // stopping at count * interval, so the tail of the video is covered.
        let points = (0..count)
            .map(|index| {
                SamplePoint::Timestamp(Duration::from_secs_f64(
                    index as f64 * duration / count as f64,
                ))
            })
            .collect();

        plan.allocations.push(VideoAllocation {
            video: video.path.clone(),
            points,
            skipped: None,
        });
    }

    plan
}

/// Evenly spaced frame indices: `0, step, 2*step, ...` for up to `count`
/// points, where `step = max(frame_count / count, 1)`.
///
/// When `count >= frame_count` the step degenerates to 1 and fewer than
/// `count` points are produced; the caller reports the shortfall instead of
/// treating it as an error.
fn frame_points(frame_count: u64, count: u64) -> Vec<SamplePoint> {
    let step = (frame_count / count).max(1);
    (0..count)
        .map(|index| index * step)
        .take_while(|&frame| frame < frame_count)
        .map(SamplePoint::Frame)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_points_even_spacing() {
        let points = frame_points(300, 3);
        assert_eq!(
            points,
            vec![
                SamplePoint::Frame(0),
                SamplePoint::Frame(100),
                SamplePoint::Frame(200),
            ]
        );
    }

    #[test]
    fn frame_points_degenerate_step_clips_to_video_length() {
        // 5 points requested from a 3-frame video: step forced to 1, only 3
        // frames exist.
        let points = frame_points(3, 5);
        assert_eq!(
            points,
            vec![
                SamplePoint::Frame(0),
                SamplePoint::Frame(1),
                SamplePoint::Frame(2),
            ]
        );
    }
}
