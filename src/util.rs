//! Internal helpers for FFmpeg timestamp arithmetic and pixel-data copying.

use std::time::Duration;

use ffmpeg_next::{Rational, frame::Video as VideoFrame};

/// Copy pixel data from an FFmpeg video frame into a tightly-packed RGB
/// buffer.
///
/// FFmpeg frames frequently carry per-row padding (stride > width × 3); this
/// strips the padding so the result can be handed to
/// [`image::RgbImage::from_raw`].
pub(crate) fn frame_to_rgb_buffer(video_frame: &VideoFrame, width: u32, height: u32) -> Vec<u8> {
    let stride = video_frame.stride(0);
    let packed_stride = (width as usize) * 3;
    let data = video_frame.data(0);

    if stride == packed_stride {
        data[..packed_stride * (height as usize)].to_vec()
    } else {
        let mut buffer = Vec::with_capacity(packed_stride * (height as usize));
        for row in 0..(height as usize) {
            let row_start = row * stride;
            buffer.extend_from_slice(&data[row_start..row_start + packed_stride]);
        }
        buffer
    }
}

/// Convert a frame number to a timestamp in the stream's time base, suitable
/// for passing to FFmpeg seeking functions.
pub(crate) fn frame_number_to_stream_timestamp(
    frame_number: u64,
    frames_per_second: f64,
    time_base: Rational,
) -> i64 {
    let seconds = frame_number as f64 / frames_per_second;
    let numerator = time_base.numerator() as f64;
    let denominator = time_base.denominator() as f64;
    (seconds * denominator / numerator) as i64
}

/// Convert a [`Duration`] to a frame number using the video's frame rate.
pub(crate) fn timestamp_to_frame_number(timestamp: Duration, frames_per_second: f64) -> u64 {
    (timestamp.as_secs_f64() * frames_per_second) as u64
}

/// Rescale a PTS value from the stream time base to a frame number.
pub(crate) fn pts_to_frame_number(pts: i64, time_base: Rational, frames_per_second: f64) -> u64 {
    let seconds = pts as f64 * time_base.numerator() as f64 / time_base.denominator() as f64;
    (seconds * frames_per_second) as u64
}
