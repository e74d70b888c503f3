use crate::{
    CoreResult, RecorderError,
    audio::{AUDIO_FILE_NAME, AudioRecording},
    region::{self, BoundingBox},
    session::{
        AudioReport, AudioStatus, MediaBackend, RecordingOptions, SessionStatus, StartReport,
        StopReport,
        state::{RecordingSession, SessionState},
    },
    video::{CaptureLoop, CaptureSummary, NOMINAL_FRAME_RATE, VIDEO_FILE_NAME, VideoSink},
};

use std::{
    panic::Location,
    path::{Path, PathBuf},
    sync::Arc,
    time::{Duration, Instant},
};

use error_location::ErrorLocation;
use tokio::{
    sync::oneshot,
    task::{JoinError, JoinHandle},
};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

/// How long `stop` waits for the audio execution to notice cancellation.
pub const AUDIO_JOIN_TIMEOUT: Duration = Duration::from_secs(2);

/// Owns the single recording session and its state machine:
/// `Idle -> Armed -> Recording -> Armed`.
///
/// # Concurrency
///
/// A started session runs the capture loop, and optionally the audio loop,
/// on their own blocking executions. They share nothing but a
/// [`CancellationToken`]; each owns its devices exclusively.
///
/// Dropping a `Recorder` mid-session cancels the loops but does not wait
/// for the video file to be finalized. Call [`Recorder::stop`] first.
pub struct Recorder<B: MediaBackend> {
    backend: Arc<B>,
    output_dir: PathBuf,
    state: SessionState,
}

impl<B: MediaBackend> Recorder<B> {
    /// Create an idle recorder writing its files into `output_dir`.
    pub fn new(backend: B, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            backend: Arc::new(backend),
            output_dir: output_dir.into(),
            state: SessionState::Idle,
        }
    }

    /// Current lifecycle state.
    pub fn status(&self) -> SessionStatus {
        self.state.status()
    }

    /// Directory receiving the output files.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Fixed location of the video file.
    pub fn video_path(&self) -> PathBuf {
        self.output_dir.join(VIDEO_FILE_NAME)
    }

    /// Fixed location of the waveform file.
    pub fn audio_path(&self) -> PathBuf {
        self.output_dir.join(AUDIO_FILE_NAME)
    }

    /// Select the whole display and arm the recorder with it.
    #[instrument(skip(self))]
    pub async fn select_full_screen(&mut self) -> CoreResult<BoundingBox> {
        self.ensure_not_recording()?;

        let backend = Arc::clone(&self.backend);
        let region = tokio::task::spawn_blocking(move || {
            let screen = backend.open_screen()?;
            region::select_full_screen(&screen)
        })
        .await
        .map_err(task_failed)??;

        self.arm(region)?;

        Ok(region)
    }

    /// Set (or replace) the region to record.
    ///
    /// # Errors
    ///
    /// Rejected while recording: the region is fixed for a session.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn arm(&mut self, region: BoundingBox) -> CoreResult<()> {
        self.ensure_not_recording()?;

        self.state = SessionState::Armed { region };
        info!(%region, "Recorder armed");

        Ok(())
    }

    /// Start recording the armed region.
    ///
    /// Returns once the video file is open and, if audio was requested,
    /// once the audio device has opened or failed to. Without a usable
    /// input device recording goes ahead video-only and the report says so.
    ///
    /// # Errors
    ///
    /// `NoSelection` when idle, `AlreadyRecording` during a session, or the
    /// error that prevented the screen or video file from opening. The
    /// state is unchanged on error.
    #[instrument(skip(self))]
    pub async fn start(&mut self, options: RecordingOptions) -> CoreResult<StartReport> {
        let region = match &self.state {
            SessionState::Idle => {
                return Err(RecorderError::NoSelection {
                    location: ErrorLocation::from(Location::caller()),
                });
            }
            SessionState::Recording(_) => {
                return Err(RecorderError::AlreadyRecording {
                    location: ErrorLocation::from(Location::caller()),
                });
            }
            SessionState::Armed { region } => *region,
        };

        std::fs::create_dir_all(&self.output_dir).map_err(|e| RecorderError::EncoderError {
            reason: format!(
                "Failed to create output directory {}: {}",
                self.output_dir.display(),
                e
            ),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let session_id = Uuid::new_v4();
        let capture_loop = CaptureLoop::new(region, options.quality);
        let cancel = CancellationToken::new();
        let video_path = self.video_path();

        // The capture execution opens the screen and the sink itself and
        // reports back before looping.
        let (ready_tx, ready_rx) = oneshot::channel();
        let capture = {
            let backend = Arc::clone(&self.backend);
            let cancel = cancel.clone();
            let video_path = video_path.clone();
            tokio::task::spawn_blocking(move || {
                capture_task(backend.as_ref(), capture_loop, &video_path, &cancel, ready_tx)
            })
        };

        match ready_rx.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                let _ = capture.await;
                return Err(e);
            }
            Err(_) => return Err(capture_exit_error(capture.await)),
        }

        let (audio, audio_status) = self.spawn_audio(&options, &cancel).await;

        self.state = SessionState::Recording(RecordingSession {
            session_id,
            region,
            quality: options.quality,
            started_at: Instant::now(),
            video_path: video_path.clone(),
            cancel,
            capture,
            audio,
        });

        info!(
            session_id = %session_id,
            %region,
            quality = %options.quality,
            audio = ?audio_status,
            "Recording started"
        );

        Ok(StartReport {
            session_id,
            size: capture_loop.size(),
            video_path,
            audio: audio_status,
        })
    }

    /// Stop the session, finalize the video file and return to `Armed`.
    ///
    /// Waits up to [`AUDIO_JOIN_TIMEOUT`] for audio, then for the capture
    /// loop to finalize its sink. The selection is kept.
    ///
    /// # Errors
    ///
    /// `NotRecording` outside a session (no state change). After a session
    /// ended, errors from finalizing the video are returned, but the
    /// recorder is back in `Armed` regardless.
    #[instrument(skip(self))]
    pub async fn stop(&mut self) -> CoreResult<StopReport> {
        let session = match std::mem::replace(&mut self.state, SessionState::Idle) {
            SessionState::Recording(session) => session,
            other => {
                self.state = other;
                return Err(RecorderError::NotRecording {
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        let RecordingSession {
            session_id,
            region,
            started_at,
            video_path,
            cancel,
            capture,
            audio,
            ..
        } = session;

        self.state = SessionState::Armed { region };
        cancel.cancel();

        let audio = match audio {
            Some(handle) => join_audio(session_id, handle).await,
            None => None,
        };

        let capture = capture.await.map_err(task_failed)??;
        let duration = started_at.elapsed();

        info!(
            session_id = %session_id,
            duration_ms = duration.as_millis(),
            frames_written = capture.frames_written,
            "Recording stopped"
        );

        Ok(StopReport {
            session_id,
            duration,
            video_path,
            capture,
            audio,
        })
    }

    #[track_caller]
    fn ensure_not_recording(&self) -> CoreResult<()> {
        if matches!(self.state, SessionState::Recording(_)) {
            return Err(RecorderError::AlreadyRecording {
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(())
    }

    async fn spawn_audio(
        &self,
        options: &RecordingOptions,
        cancel: &CancellationToken,
    ) -> (Option<JoinHandle<CoreResult<AudioReport>>>, AudioStatus) {
        if !options.record_audio {
            return (None, AudioStatus::Disabled);
        }

        let backend = Arc::clone(&self.backend);
        let has_input = tokio::task::spawn_blocking(move || backend.has_audio_input())
            .await
            .unwrap_or(false);

        if !has_input {
            warn!("Audio device not found, recording video only");
            return (None, AudioStatus::NoDevice);
        }

        // The audio execution opens the device itself and reports back
        // before reading, so the status below reflects an open stream.
        let (ready_tx, ready_rx) = oneshot::channel();
        let handle = {
            let backend = Arc::clone(&self.backend);
            let cancel = cancel.clone();
            let audio_path = self.audio_path();
            tokio::task::spawn_blocking(move || {
                audio_task(backend.as_ref(), &audio_path, &cancel, ready_tx)
            })
        };

        let status = match ready_rx.await {
            Ok(Ok(true)) => return (Some(handle), AudioStatus::Recording),
            Ok(Ok(false)) => {
                warn!("Audio device disappeared before capture started, recording video only");
                AudioStatus::NoDevice
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Audio device could not be opened, recording video only");
                AudioStatus::Unavailable
            }
            Err(_) => {
                warn!("Audio task exited before reporting readiness, recording video only");
                AudioStatus::Unavailable
            }
        };

        // The task has already returned; reap it.
        if let Err(e) = handle.await {
            error!(error = %e, "Audio task panicked");
        }

        (None, status)
    }
}

impl<B: MediaBackend> Drop for Recorder<B> {
    fn drop(&mut self) {
        if let SessionState::Recording(session) = &self.state {
            warn!(session_id = %session.session_id, "Recorder dropped while recording");
            session.cancel.cancel();
        }
    }
}

fn capture_task<B: MediaBackend>(
    backend: &B,
    capture_loop: CaptureLoop,
    video_path: &Path,
    cancel: &CancellationToken,
    ready_tx: oneshot::Sender<CoreResult<()>>,
) -> CoreResult<CaptureSummary> {
    let opened = backend.open_screen().and_then(|screen| {
        let sink = backend.open_sink(video_path, capture_loop.size(), NOMINAL_FRAME_RATE)?;
        Ok((screen, sink))
    });

    let (mut screen, mut sink) = match opened {
        Ok(pair) => pair,
        Err(e) => {
            let reason = e.to_string();
            let _ = ready_tx.send(Err(e));
            return Err(RecorderError::TaskFailed {
                reason: format!("Capture never started: {}", reason),
                location: ErrorLocation::from(Location::caller()),
            });
        }
    };

    if ready_tx.send(Ok(())).is_err() {
        // Nobody is waiting for this session any more.
        sink.finish()?;
        return Err(RecorderError::TaskFailed {
            reason: "Start was abandoned".to_string(),
            location: ErrorLocation::from(Location::caller()),
        });
    }

    capture_loop.run(&mut screen, &mut sink, cancel)
}

fn audio_task<B: MediaBackend>(
    backend: &B,
    audio_path: &Path,
    cancel: &CancellationToken,
    ready_tx: oneshot::Sender<CoreResult<bool>>,
) -> CoreResult<AudioReport> {
    let source = match backend.open_audio() {
        Ok(Some(source)) => source,
        Ok(None) => {
            let _ = ready_tx.send(Ok(false));
            return Ok(AudioReport::default());
        }
        Err(e) => {
            let reason = e.to_string();
            let _ = ready_tx.send(Err(e));
            return Err(RecorderError::TaskFailed {
                reason: format!("Audio never started: {}", reason),
                location: ErrorLocation::from(Location::caller()),
            });
        }
    };

    if ready_tx.send(Ok(true)).is_err() {
        // Nobody is waiting for this session any more.
        return Ok(AudioReport::default());
    }

    let recording = AudioRecording::capture(source, cancel);
    let written = recording.save(audio_path)?;

    Ok(AudioReport {
        chunks: recording.chunks().len(),
        sample_frames: recording.sample_frames(),
        file: written.then(|| audio_path.to_path_buf()),
    })
}

async fn join_audio(
    session_id: Uuid,
    handle: JoinHandle<CoreResult<AudioReport>>,
) -> Option<AudioReport> {
    match tokio::time::timeout(AUDIO_JOIN_TIMEOUT, handle).await {
        Ok(Ok(Ok(report))) => Some(report),
        Ok(Ok(Err(e))) => {
            error!(session_id = %session_id, error = %e, "Audio recording error");
            None
        }
        Ok(Err(e)) => {
            error!(session_id = %session_id, error = %e, "Audio task panicked");
            None
        }
        Err(_) => {
            warn!(
                session_id = %session_id,
                "Audio task did not stop within timeout, leaving it to finish in the background"
            );
            None
        }
    }
}

#[track_caller]
fn task_failed(e: JoinError) -> RecorderError {
    RecorderError::TaskFailed {
        reason: e.to_string(),
        location: ErrorLocation::from(Location::caller()),
    }
}

#[track_caller]
fn capture_exit_error(result: Result<CoreResult<CaptureSummary>, JoinError>) -> RecorderError {
    match result {
        Ok(Err(e)) => e,
        Ok(Ok(_)) => RecorderError::TaskFailed {
            reason: "Capture exited before reporting readiness".to_string(),
            location: ErrorLocation::from(Location::caller()),
        },
        Err(e) => task_failed(e),
    }
}
