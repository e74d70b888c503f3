use crate::{
    CoreResult,
    region::BoundingBox,
    video::{FrameSize, QualityPreset, ScreenSource, VideoSink},
};

use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, trace};

/// Nominal frame rate stamped into the container.
pub const NOMINAL_FRAME_RATE: usize = 20;

/// Fixed output file name of the video stream.
pub const VIDEO_FILE_NAME: &str = "screen_record.mp4";

/// Why the capture loop stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureStop {
    /// The session was stopped.
    Cancelled,
    /// A grab, conversion or encode failed; no retry was attempted.
    Failed(String),
}

/// What the capture loop produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureSummary {
    /// Frames appended to the sink.
    pub frames_written: u64,
    /// Encoded frame size.
    pub size: FrameSize,
    /// Reason the loop exited.
    pub stop: CaptureStop,
}

/// Grab, convert, rescale and append frames until cancelled.
///
/// There is no frame pacing: the loop runs as fast as capture and encode
/// allow, while the sink stamps frames at [`NOMINAL_FRAME_RATE`].
#[derive(Debug, Clone, Copy)]
pub struct CaptureLoop {
    region: BoundingBox,
    size: FrameSize,
}

impl CaptureLoop {
    /// Prepare a loop for `region`, encoded at `quality`.
    pub fn new(region: BoundingBox, quality: QualityPreset) -> Self {
        Self {
            region,
            size: quality.target_size(&region),
        }
    }

    /// Encoded frame size.
    pub fn size(&self) -> FrameSize {
        self.size
    }

    /// Run until `cancel` fires or a frame fails, then finalize the sink.
    ///
    /// The sink is finalized on every exit path so whatever was written
    /// stays playable. An error is returned only if finalizing fails.
    #[instrument(skip(self, screen, sink, cancel), fields(region = %self.region))]
    pub fn run<S, K>(
        &self,
        screen: &mut S,
        sink: &mut K,
        cancel: &CancellationToken,
    ) -> CoreResult<CaptureSummary>
    where
        S: ScreenSource + ?Sized,
        K: VideoSink + ?Sized,
    {
        let mut frames_written = 0u64;

        info!(
            width = self.size.width,
            height = self.size.height,
            "Capture loop started"
        );

        let stop = loop {
            if cancel.is_cancelled() {
                break CaptureStop::Cancelled;
            }

            match self.capture_one(screen, sink) {
                Ok(()) => frames_written += 1,
                Err(e) => {
                    error!(error = %e, frames_written, "Capture failed, stopping recording");
                    break CaptureStop::Failed(e.to_string());
                }
            }
        };

        sink.finish()?;

        info!(frames_written, ?stop, "Capture loop finished");

        Ok(CaptureSummary {
            frames_written,
            size: self.size,
            stop,
        })
    }

    fn capture_one<S, K>(&self, screen: &mut S, sink: &mut K) -> CoreResult<()>
    where
        S: ScreenSource + ?Sized,
        K: VideoSink + ?Sized,
    {
        let frame = screen
            .grab(&self.region)?
            .into_layout(sink.layout())
            .resized(self.size)?;

        sink.append(&frame)?;
        trace!("Frame appended");

        Ok(())
    }
}
