use crate::{
    CoreResult,
    audio::{ChunkSource, CpalChunkSource},
    video::{FrameSize, Mp4Sink, ScreenSource, VideoSink, XcapScreen},
};

use std::path::Path;

/// Factory for the devices a recording session needs.
///
/// Every `open_*` call happens on the background execution that will own
/// the returned value, so the associated types need not be `Send`.
pub trait MediaBackend: Send + Sync + 'static {
    /// Display to capture from.
    type Screen: ScreenSource;
    /// Video file writer.
    type Sink: VideoSink;
    /// Audio input.
    type Audio: ChunkSource;

    /// Open the display.
    fn open_screen(&self) -> CoreResult<Self::Screen>;

    /// Create the video file at `path`.
    fn open_sink(&self, path: &Path, size: FrameSize, frame_rate: usize)
    -> CoreResult<Self::Sink>;

    /// Whether an audio input device is present.
    fn has_audio_input(&self) -> bool;

    /// Open the first audio input device, or `None` if there is none.
    fn open_audio(&self) -> CoreResult<Option<Self::Audio>>;
}

/// Real devices: `xcap` display, FFmpeg MP4 file, `cpal` input.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemBackend;

impl MediaBackend for SystemBackend {
    type Screen = XcapScreen;
    type Sink = Mp4Sink;
    type Audio = CpalChunkSource;

    fn open_screen(&self) -> CoreResult<Self::Screen> {
        XcapScreen::primary()
    }

    fn open_sink(
        &self,
        path: &Path,
        size: FrameSize,
        frame_rate: usize,
    ) -> CoreResult<Self::Sink> {
        Mp4Sink::create(path, size, frame_rate)
    }

    fn has_audio_input(&self) -> bool {
        CpalChunkSource::has_input_device()
    }

    fn open_audio(&self) -> CoreResult<Option<Self::Audio>> {
        CpalChunkSource::open_first_input()
    }
}
