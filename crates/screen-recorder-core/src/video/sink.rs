//! Video sinks: anything that accepts successive frames and finalizes them
//! into a playable file.

use crate::{
    CoreResult, RecorderError,
    video::{FrameBuffer, FrameSize, PixelLayout},
};

use std::{panic::Location, path::Path};

use error_location::ErrorLocation;
use ndarray::Array3;
use tracing::{debug, info, instrument};
use video_rs::{
    encode::{Encoder, Settings},
    time::Time,
};

/// Writer that turns appended frames into a video file.
pub trait VideoSink {
    /// Channel order the sink expects for incoming frames.
    fn layout(&self) -> PixelLayout;

    /// Append one frame. Its size must equal the size the sink was opened with.
    fn append(&mut self, frame: &FrameBuffer) -> CoreResult<()>;

    /// Flush and close the container. Called exactly once, after the last frame.
    fn finish(&mut self) -> CoreResult<()>;
}

/// MPEG-4 file with an H.264 (yuv420p) stream, encoded through FFmpeg.
///
/// Frames are stamped at a fixed nominal rate: frame `n` lands at
/// `n / frame_rate` seconds regardless of when it was captured.
pub struct Mp4Sink {
    encoder: Encoder,
    size: FrameSize,
    position: Time,
    frame_duration: Time,
    frames: u64,
}

impl Mp4Sink {
    /// Create (or overwrite) `path` for frames of `size` at `frame_rate` fps.
    #[track_caller]
    #[instrument]
    pub fn create(path: &Path, size: FrameSize, frame_rate: usize) -> CoreResult<Self> {
        video_rs::init().map_err(|e| RecorderError::EncoderError {
            reason: format!("Failed to initialize FFmpeg: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let settings =
            Settings::preset_h264_yuv420p(size.width as usize, size.height as usize, false);

        let encoder = Encoder::new(path, settings).map_err(|e| RecorderError::EncoderError {
            reason: format!("Failed to open {}: {}", path.display(), e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(
            path = %path.display(),
            width = size.width,
            height = size.height,
            frame_rate,
            "Video sink opened"
        );

        Ok(Self {
            encoder,
            size,
            position: Time::zero(),
            frame_duration: Time::from_nth_of_a_second(frame_rate),
            frames: 0,
        })
    }
}

impl VideoSink for Mp4Sink {
    fn layout(&self) -> PixelLayout {
        // video-rs takes HWC RGB24 arrays.
        PixelLayout::Rgb
    }

    #[track_caller]
    fn append(&mut self, frame: &FrameBuffer) -> CoreResult<()> {
        if frame.size() != self.size {
            return Err(RecorderError::EncoderError {
                reason: format!(
                    "Frame is {}x{}, sink expects {}x{}",
                    frame.size().width,
                    frame.size().height,
                    self.size.width,
                    self.size.height
                ),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let pixels = Array3::from_shape_vec(
            (self.size.height as usize, self.size.width as usize, 3),
            frame.data().to_vec(),
        )
        .map_err(|e| RecorderError::EncoderError {
            reason: format!("Failed to shape frame: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        self.encoder
            .encode(&pixels, self.position)
            .map_err(|e| RecorderError::EncoderError {
                reason: format!("Failed to encode frame {}: {}", self.frames, e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        self.position = self.position.aligned_with(self.frame_duration).add();
        self.frames += 1;

        Ok(())
    }

    #[track_caller]
    fn finish(&mut self) -> CoreResult<()> {
        self.encoder
            .finish()
            .map_err(|e| RecorderError::EncoderError {
                reason: format!("Failed to finalize container: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        debug!(frames = self.frames, "Video sink finalized");

        Ok(())
    }
}
