//! Error types for the `stillsift` crate.
//!
//! This module defines [`SiftError`], the unified error type returned by all
//! fallible operations in the crate. Variants carry enough context (file
//! paths, frame numbers, upstream messages) to diagnose a problem without
//! extra logging at the call site.
//!
//! The error taxonomy mirrors how the pipeline treats failures: probe and
//! extraction errors are per-video / per-sample-point and never abort a run
//! (they surface through the run report instead), while strategy and
//! parameter errors are caller contract violations detected before any
//! folder is touched.

use std::{io::Error as IoError, path::PathBuf};

use ffmpeg_next::Error as FfmpegError;
use image::ImageError;
use thiserror::Error;

/// The unified error type for all `stillsift` operations.
///
/// Every public method that can fail returns `Result<T, SiftError>`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SiftError {
    /// A video could not be probed for duration / frame count metadata.
    ///
    /// Non-fatal: the orchestrator drops the video from its folder task and
    /// continues with the remaining videos.
    #[error("Failed to probe video {path}: {reason}")]
    Probe {
        /// Path of the video that failed to probe.
        path: PathBuf,
        /// Underlying reason the probe failed.
        reason: String,
    },

    /// A single sample point failed to materialise as an image file.
    ///
    /// Non-fatal: logged and recorded in the run report; remaining sample
    /// points and videos are still processed.
    #[error("Failed to extract frame from {path}: {reason}")]
    Extraction {
        /// Path of the video the frame was being extracted from.
        path: PathBuf,
        /// Underlying reason the extraction failed.
        reason: String,
    },

    /// The file does not contain a video stream.
    #[error("No video stream found in file")]
    NoVideoStream,

    /// A video frame could not be decoded.
    #[error("Failed to decode video frame: {0}")]
    VideoDecode(String),

    /// The requested frame number exceeds the total frame count.
    #[error("Frame {frame_number} is out of range (video has {total_frames} frames)")]
    FrameOutOfRange {
        /// The frame number that was requested.
        frame_number: u64,
        /// The total number of frames in the video.
        total_frames: u64,
    },

    /// A folder contained no valid videos, or their total duration was zero.
    ///
    /// Non-fatal at the run level: the folder is reported with zero counts
    /// and the run moves on to the next folder.
    #[error("No valid videos to allocate screenshots for")]
    EmptyInput,

    /// An unrecognised strategy name was supplied.
    ///
    /// Fatal: this is a caller contract violation, detected during
    /// configuration validation before any folder is processed.
    #[error("Unknown strategy '{0}' (expected 'max_screenshots' or 'time_based')")]
    InvalidStrategy(String),

    /// The per-folder screenshot cap was zero.
    #[error("Screenshot cap must be greater than zero")]
    InvalidCap,

    /// The sampling interval was zero, negative, or not finite.
    #[error("Sampling interval must be a positive, finite number of seconds")]
    InvalidInterval,

    /// The input root does not exist or is not a directory.
    #[error("Input folder {path} is not a readable directory: {reason}")]
    InputFolder {
        /// The configured input root.
        path: PathBuf,
        /// Underlying reason it was rejected.
        reason: String,
    },

    /// An error originating from the FFmpeg libraries.
    #[error("FFmpeg error: {0}")]
    Ffmpeg(String),

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// An error from the `image` crate while encoding a screenshot.
    #[error("Image processing error: {0}")]
    Image(#[from] ImageError),

    /// The operation was cancelled via a
    /// [`CancellationToken`](crate::CancellationToken).
    #[error("Operation cancelled")]
    Cancelled,
}

impl From<FfmpegError> for SiftError {
    fn from(error: FfmpegError) -> Self {
        SiftError::Ffmpeg(error.to_string())
    }
}
