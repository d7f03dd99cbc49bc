//! The frame source capability.
//!
//! The orchestrator never decodes video itself; it talks to a
//! [`FrameSource`], which answers two questions: what are a video's duration
//! and frame count ([`FrameSource::probe`]), and what does the video look
//! like at a given sample point ([`FrameSource::extract_frame`]).
//!
//! [`FfmpegFrameSource`] is the production implementation, backed by FFmpeg
//! via the `ffmpeg-next` crate. It opens a fresh demuxer per call, seeks to
//! the nearest keyframe before the target, decodes forward to the exact
//! frame, and writes a JPEG at the configured quality. Whether a backing
//! implementation seeks by frame, by timestamp, or batches through a filter
//! graph is deliberately not distinguished by the rest of the crate — tests
//! substitute a mock source and the pipeline cannot tell the difference.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::time::Duration;

use ffmpeg_next::{
    codec::context::Context as CodecContext,
    format::{Pixel, context::Input},
    frame::Video as VideoFrame,
    media::Type,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
};
use image::{DynamicImage, RgbImage, codecs::jpeg::JpegEncoder};

use crate::allocator::SamplePoint;
use crate::error::SiftError;
use crate::util;

/// Metadata returned by a [`FrameSource::probe`] call.
///
/// Only what allocation needs: playback duration, total frame count, and the
/// frame rate used to convert between the two.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeReport {
    /// Total playback duration.
    pub duration: Duration,
    /// Total (or estimated) number of frames.
    pub frame_count: u64,
    /// Average frames per second.
    pub frames_per_second: f64,
}

/// Capability for probing videos and materialising single frames.
///
/// Implementations must be stateless per call: probing or extracting from
/// one video must not affect subsequent calls for other videos. Both methods
/// take `&self` so a source can be shared freely.
pub trait FrameSource {
    /// Report a video's duration and frame count.
    ///
    /// # Errors
    ///
    /// Returns [`SiftError::Probe`] if the file cannot be opened, has no
    /// video stream, or carries no usable duration/frame-rate metadata.
    fn probe(&self, path: &Path) -> Result<ProbeReport, SiftError>;

    /// Produce a single image file for `point` of the video at `path`.
    ///
    /// The image is written to `output`; parent directories must already
    /// exist.
    ///
    /// # Errors
    ///
    /// Any error means this one sample point failed; the caller decides
    /// whether to continue (the orchestrator always does).
    fn extract_frame(
        &self,
        path: &Path,
        point: &SamplePoint,
        output: &Path,
    ) -> Result<(), SiftError>;
}

/// FFmpeg-backed [`FrameSource`].
///
/// Each call opens its own input context, so the source holds no file
/// handles between calls and is cheap to construct.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
///
/// use stillsift::{FfmpegFrameSource, FrameSource, SamplePoint};
///
/// let source = FfmpegFrameSource::new();
/// let report = source.probe(Path::new("clip.mp4"))?;
/// println!("{:?} over {} frames", report.duration, report.frame_count);
///
/// source.extract_frame(
///     Path::new("clip.mp4"),
///     &SamplePoint::Frame(0),
///     Path::new("first.jpg"),
/// )?;
/// # Ok::<(), stillsift::SiftError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FfmpegFrameSource {
    jpeg_quality: u8,
}

impl Default for FfmpegFrameSource {
    fn default() -> Self {
        Self::new()
    }
}

impl FfmpegFrameSource {
    /// Create a source writing JPEGs at maximum quality (100).
    pub fn new() -> Self {
        Self { jpeg_quality: 100 }
    }

    /// Override the JPEG encoder quality (1 – 100).
    #[must_use]
    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }

    /// Open `path` and locate its best video stream.
    fn open_input(path: &Path) -> Result<(Input, usize), SiftError> {
        // Initialise ffmpeg (safe to call multiple times).
        ffmpeg_next::init().map_err(|error| SiftError::Probe {
            path: path.to_path_buf(),
            reason: format!("FFmpeg initialisation failed: {error}"),
        })?;

        let input_context = ffmpeg_next::format::input(&path).map_err(|error| SiftError::Probe {
            path: path.to_path_buf(),
            reason: error.to_string(),
        })?;

        let stream_index = input_context
            .streams()
            .best(Type::Video)
            .map(|stream| stream.index())
            .ok_or(SiftError::Probe {
                path: path.to_path_buf(),
                reason: "no video stream".to_string(),
            })?;

        Ok((input_context, stream_index))
    }

    fn probe_metadata(path: &Path) -> Result<ProbeReport, SiftError> {
        let (input_context, stream_index) = Self::open_input(path)?;
        let stream = input_context
            .stream(stream_index)
            .ok_or(SiftError::NoVideoStream)?;

        // Container-level duration, in AV_TIME_BASE microseconds.
        let duration_microseconds = input_context.duration();
        let duration = if duration_microseconds > 0 {
            Duration::from_micros(duration_microseconds as u64)
        } else {
            Duration::ZERO
        };

        let frame_rate = stream.avg_frame_rate();
        let frames_per_second = if frame_rate.denominator() != 0 {
            frame_rate.numerator() as f64 / frame_rate.denominator() as f64
        } else {
            let rate = stream.rate();
            if rate.denominator() != 0 {
                rate.numerator() as f64 / rate.denominator() as f64
            } else {
                0.0
            }
        };

        // Prefer the demuxer's frame count; fall back to duration × fps for
        // containers that do not record one.
        let declared_frames = stream.frames();
        let frame_count = if declared_frames > 0 {
            declared_frames as u64
        } else if frames_per_second > 0.0 {
            (duration.as_secs_f64() * frames_per_second) as u64
        } else {
            0
        };

        let report = ProbeReport {
            duration,
            frame_count,
            frames_per_second,
        };
        Self::ensure_usable(path, &report)?;
        Ok(report)
    }

    /// Reject metadata extraction cannot work with.
    ///
    /// A zero frame rate is as fatal as a missing duration: the frame and
    /// timestamp conversions divide by it, so a container can declare a
    /// frame count and still be impossible to seek in. Such videos are
    /// excluded at probe time rather than failing (or worse, extracting the
    /// wrong frames) later.
    fn ensure_usable(path: &Path, report: &ProbeReport) -> Result<(), SiftError> {
        if report.duration.is_zero()
            || report.frame_count == 0
            || report.frames_per_second <= 0.0
        {
            return Err(SiftError::Probe {
                path: path.to_path_buf(),
                reason: format!(
                    "missing duration/frame-rate metadata (duration {:?}, {} frames, {:.2} fps)",
                    report.duration, report.frame_count, report.frames_per_second
                ),
            });
        }
        Ok(())
    }

    /// Decode the frame at `frame_number` into an RGB image.
    ///
    /// Seeks to the nearest keyframe before the target, then decodes forward
    /// until the requested frame (or the first frame past it) is reached.
    fn decode_frame(
        path: &Path,
        frame_number: u64,
        report: &ProbeReport,
    ) -> Result<DynamicImage, SiftError> {
        let (mut input_context, stream_index) = Self::open_input(path)?;

        if frame_number >= report.frame_count {
            return Err(SiftError::FrameOutOfRange {
                frame_number,
                total_frames: report.frame_count,
            });
        }

        let stream = input_context
            .stream(stream_index)
            .ok_or(SiftError::NoVideoStream)?;
        let time_base = stream.time_base();
        let codec_parameters = stream.parameters();
        let decoder_context = CodecContext::from_parameters(codec_parameters)?;
        let mut decoder = decoder_context.decoder().video()?;

        let width = decoder.width();
        let height = decoder.height();

        let mut scaler = ScalingContext::get(
            decoder.format(),
            width,
            height,
            Pixel::RGB24,
            width,
            height,
            ScalingFlags::BILINEAR,
        )?;

        let target_timestamp = util::frame_number_to_stream_timestamp(
            frame_number,
            report.frames_per_second,
            time_base,
        );
        input_context.seek(target_timestamp, ..target_timestamp)?;

        let mut decoded_frame = VideoFrame::empty();
        let mut rgb_frame = VideoFrame::empty();

        for (stream, packet) in input_context.packets() {
            if stream.index() != stream_index {
                continue;
            }

            decoder.send_packet(&packet)?;

            while decoder.receive_frame(&mut decoded_frame).is_ok() {
                let pts = decoded_frame.pts().unwrap_or(0);
                let current = util::pts_to_frame_number(pts, time_base, report.frames_per_second);

                // Landing past the target means the exact index does not
                // exist after the seek; the closest later frame stands in.
                if current >= frame_number {
                    scaler.run(&decoded_frame, &mut rgb_frame)?;
                    return frame_to_image(&rgb_frame, width, height);
                }
            }
        }

        // Flush the decoder.
        decoder.send_eof()?;
        while decoder.receive_frame(&mut decoded_frame).is_ok() {
            let pts = decoded_frame.pts().unwrap_or(0);
            let current = util::pts_to_frame_number(pts, time_base, report.frames_per_second);

            if current >= frame_number {
                scaler.run(&decoded_frame, &mut rgb_frame)?;
                return frame_to_image(&rgb_frame, width, height);
            }
        }

        Err(SiftError::VideoDecode(format!(
            "Could not locate frame {frame_number} in the video stream"
        )))
    }
}

impl FrameSource for FfmpegFrameSource {
    fn probe(&self, path: &Path) -> Result<ProbeReport, SiftError> {
        Self::probe_metadata(path)
    }

    fn extract_frame(
        &self,
        path: &Path,
        point: &SamplePoint,
        output: &Path,
    ) -> Result<(), SiftError> {
        let report = Self::probe_metadata(path)?;

        let frame_number = match point {
            SamplePoint::Frame(number) => *number,
            SamplePoint::Timestamp(timestamp) => {
                util::timestamp_to_frame_number(*timestamp, report.frames_per_second)
                    .min(report.frame_count.saturating_sub(1))
            }
        };

        let image = Self::decode_frame(path, frame_number, &report)?;

        let file = File::create(output)?;
        let encoder = JpegEncoder::new_with_quality(BufWriter::new(file), self.jpeg_quality);
        image.write_with_encoder(encoder)?;

        log::debug!("Wrote {point} of {} to {}", path.display(), output.display());
        Ok(())
    }
}

/// Convert a decoded RGB24 FFmpeg frame into a [`DynamicImage`].
fn frame_to_image(
    rgb_frame: &VideoFrame,
    width: u32,
    height: u32,
) -> Result<DynamicImage, SiftError> {
    let buffer = util::frame_to_rgb_buffer(rgb_frame, width, height);
    let image = RgbImage::from_raw(width, height, buffer).ok_or_else(|| {
        SiftError::VideoDecode("Frame buffer does not match expected dimensions".to_string())
    })?;
    Ok(DynamicImage::ImageRgb8(image))
}

/// FFmpeg internal log verbosity level.
///
/// FFmpeg has its own console logging, separate from the Rust `log` facade.
/// This wrapper lets users of `stillsift` quiet or tune that output without
/// importing `ffmpeg-next` directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FfmpegLogLevel {
    /// Print no output at all.
    Quiet,
    /// Log only conditions that abort the process.
    Panic,
    /// Log only unrecoverable errors.
    Fatal,
    /// Log recoverable errors.
    Error,
    /// Log warnings (FFmpeg's default level).
    Warning,
    /// Log informational messages.
    Info,
    /// Log verbose informational messages.
    Verbose,
    /// Log debugging messages.
    Debug,
    /// Extremely verbose tracing output.
    Trace,
}

impl FfmpegLogLevel {
    fn to_ffmpeg_level(self) -> ffmpeg_next::util::log::Level {
        use ffmpeg_next::util::log::Level;
        match self {
            FfmpegLogLevel::Quiet => Level::Quiet,
            FfmpegLogLevel::Panic => Level::Panic,
            FfmpegLogLevel::Fatal => Level::Fatal,
            FfmpegLogLevel::Error => Level::Error,
            FfmpegLogLevel::Warning => Level::Warning,
            FfmpegLogLevel::Info => Level::Info,
            FfmpegLogLevel::Verbose => Level::Verbose,
            FfmpegLogLevel::Debug => Level::Debug,
            FfmpegLogLevel::Trace => Level::Trace,
        }
    }
}

/// Set FFmpeg's internal log verbosity.
///
/// Controls what FFmpeg prints to stderr; it does **not** affect Rust-side
/// `log` crate output.
pub fn set_ffmpeg_log_level(level: FfmpegLogLevel) {
    ffmpeg_next::util::log::set_level(level.to_ffmpeg_level());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(duration_secs: u64, frame_count: u64, fps: f64) -> ProbeReport {
        ProbeReport {
            duration: Duration::from_secs(duration_secs),
            frame_count,
            frames_per_second: fps,
        }
    }

    #[test]
    fn usable_metadata_passes() {
        let report = report(10, 300, 30.0);
        assert!(FfmpegFrameSource::ensure_usable(Path::new("clip.mp4"), &report).is_ok());
    }

    #[test]
    fn zero_frame_rate_is_a_probe_error() {
        // A container can declare a frame count without carrying a usable
        // frame rate; seeking is impossible then, so the probe must fail.
        let report = report(10, 300, 0.0);
        let result = FfmpegFrameSource::ensure_usable(Path::new("clip.mp4"), &report);
        assert!(matches!(result, Err(SiftError::Probe { .. })));
    }

    #[test]
    fn zero_duration_or_frame_count_is_a_probe_error() {
        for report in [report(0, 300, 30.0), report(10, 0, 30.0)] {
            let result = FfmpegFrameSource::ensure_usable(Path::new("clip.mp4"), &report);
            assert!(matches!(result, Err(SiftError::Probe { .. })));
        }
    }
}
