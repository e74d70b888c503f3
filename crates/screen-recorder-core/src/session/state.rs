use crate::{
    CoreResult,
    region::BoundingBox,
    video::{CaptureSummary, FrameSize, QualityPreset},
};

use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Session lifecycle as seen from outside the recorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// Nothing selected yet.
    Idle,
    /// A region is selected and recording can start.
    Armed {
        /// Selected region.
        region: BoundingBox,
    },
    /// A session is running.
    Recording {
        /// Region being captured.
        region: BoundingBox,
        /// Output resolution tier.
        quality: QualityPreset,
        /// Unique session ID for log correlation.
        session_id: Uuid,
    },
}

/// Choices made when pressing start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecordingOptions {
    /// Output resolution tier.
    pub quality: QualityPreset,
    /// Also record the first audio input device.
    pub record_audio: bool,
}

/// Audio state decided at start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioStatus {
    /// Audio was not requested.
    Disabled,
    /// Audio is being captured alongside the video.
    Recording,
    /// Audio was requested but no input device exists: video only.
    NoDevice,
    /// An input device exists but could not be opened: video only.
    Unavailable,
}

/// Returned by a successful start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartReport {
    /// Unique session ID for log correlation.
    pub session_id: Uuid,
    /// Encoded frame size.
    pub size: FrameSize,
    /// Where the video is being written.
    pub video_path: PathBuf,
    /// Whether audio is being recorded.
    pub audio: AudioStatus,
}

/// What the audio execution produced.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AudioReport {
    /// Chunks read from the device.
    pub chunks: usize,
    /// Sample frames written.
    pub sample_frames: usize,
    /// Waveform file, if at least one chunk was captured.
    pub file: Option<PathBuf>,
}

/// Returned by a successful stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopReport {
    /// Unique session ID for log correlation.
    pub session_id: Uuid,
    /// Wall-clock recording time.
    pub duration: Duration,
    /// The finalized video file.
    pub video_path: PathBuf,
    /// Frames written and why capture ended.
    pub capture: CaptureSummary,
    /// Audio outcome, `None` when audio was not running or did not finish.
    pub audio: Option<AudioReport>,
}

pub(crate) enum SessionState {
    Idle,
    Armed { region: BoundingBox },
    Recording(RecordingSession),
}

pub(crate) struct RecordingSession {
    pub(crate) session_id: Uuid,
    pub(crate) region: BoundingBox,
    pub(crate) quality: QualityPreset,
    pub(crate) started_at: Instant,
    pub(crate) video_path: PathBuf,
    pub(crate) cancel: CancellationToken,
    pub(crate) capture: JoinHandle<CoreResult<CaptureSummary>>,
    pub(crate) audio: Option<JoinHandle<CoreResult<AudioReport>>>,
}

impl SessionState {
    pub(crate) fn status(&self) -> SessionStatus {
        match self {
            Self::Idle => SessionStatus::Idle,
            Self::Armed { region } => SessionStatus::Armed { region: *region },
            Self::Recording(session) => SessionStatus::Recording {
                region: session.region,
                quality: session.quality,
                session_id: session.session_id,
            },
        }
    }
}
