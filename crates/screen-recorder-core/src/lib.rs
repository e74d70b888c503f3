//! Screen Recorder Core Library
//!
//! Region selection, screen capture to an MP4 file, and best-effort audio
//! capture to a WAV file, built on `xcap`, FFmpeg (through `video-rs`),
//! `cpal` and `hound`.
//!
//! # Example
//!
//! ```no_run
//! use screen_recorder_core::{
//!     CoreResult, QualityPreset, Recorder, RecordingOptions, SystemBackend,
//! };
//!
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> CoreResult<()> {
//!     let mut recorder = Recorder::new(SystemBackend, ".");
//!
//!     recorder.select_full_screen().await?;
//!     recorder
//!         .start(RecordingOptions {
//!             quality: QualityPreset::P720,
//!             record_audio: true,
//!         })
//!         .await?;
//!     tokio::time::sleep(Duration::from_secs(3)).await;
//!     let report = recorder.stop().await?;
//!
//!     println!("Wrote {} frames", report.capture.frames_written);
//!     Ok(())
//! }
//! ```

mod audio;
mod error;
mod region;
mod session;
mod video;

pub use {
    audio::{
        AUDIO_FILE_NAME, AudioChunk, AudioRecording, CHUNK_FRAMES, ChunkSource, CpalChunkSource,
        READ_POLL_INTERVAL, WaveFormat,
    },
    error::{RecorderError, RegionError, Result as CoreResult},
    region::{BoundingBox, DragRect, RegionDrag, ScreenPoint, SelectionOutcome, select_full_screen},
    session::{
        AUDIO_JOIN_TIMEOUT, AudioReport, AudioStatus, MediaBackend, Recorder, RecordingOptions,
        SessionStatus, StartReport, StopReport, SystemBackend,
    },
    video::{
        CaptureLoop, CaptureStop, CaptureSummary, FrameBuffer, FrameSize, Mp4Sink,
        NOMINAL_FRAME_RATE, PixelLayout, QualityPreset, ScreenSource, UnknownPreset,
        VIDEO_FILE_NAME, VideoSink, XcapScreen,
    },
};
