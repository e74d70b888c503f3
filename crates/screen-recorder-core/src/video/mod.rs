mod capture_loop;
mod frame;
mod quality;
mod screen;
mod sink;

pub use {
    capture_loop::{CaptureLoop, CaptureStop, CaptureSummary, NOMINAL_FRAME_RATE, VIDEO_FILE_NAME},
    frame::{FrameBuffer, FrameSize, PixelLayout},
    quality::{QualityPreset, UnknownPreset},
    screen::{ScreenSource, XcapScreen},
    sink::{Mp4Sink, VideoSink},
};
