use crate::{
    AppCommand, AppResult, RecorderStatus,
    ui_event::{Notice, Repaint, UiEvent},
};

use screen_recorder_core::{
    AudioStatus, BoundingBox, CaptureStop, MediaBackend, Recorder, RecorderError,
    RecordingOptions, SessionStatus, VIDEO_FILE_NAME,
};

use std::sync::mpsc::Sender;

use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};

/// Owns the [`Recorder`] on the async runtime thread and turns control
/// panel commands into recorder calls.
///
/// Results travel back to the UI thread as [`UiEvent`]s followed by a
/// repaint request, since egui only redraws on input or on request.
pub struct Controller<B: MediaBackend, R: Repaint> {
    recorder: Recorder<B>,
    command_rx: mpsc::Receiver<AppCommand>,
    event_tx: Sender<UiEvent>,
    repaint: R,
    /// Label to restore when a recording ends.
    selection: RecorderStatus,
}

impl<B: MediaBackend, R: Repaint> Controller<B, R> {
    pub(crate) fn new(
        recorder: Recorder<B>,
        command_rx: mpsc::Receiver<AppCommand>,
        event_tx: Sender<UiEvent>,
        repaint: R,
    ) -> Self {
        Self {
            recorder,
            command_rx,
            event_tx,
            repaint,
            selection: RecorderStatus::Ready,
        }
    }

    /// Run until `Shutdown` arrives or every sender is dropped.
    ///
    /// An active recording is stopped, and its file finalized, before
    /// returning.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!(output_dir = ?self.recorder.output_dir(), "Screen recorder controller starting");

        while let Some(command) = self.command_rx.recv().await {
            debug!(?command, "Command received");

            match command {
                AppCommand::SelectFullScreen => self.select_full_screen().await,
                AppCommand::ArmRegion { region } => self.arm_region(region),
                AppCommand::Start { options } => self.start(options).await,
                AppCommand::Stop => self.stop().await,
                AppCommand::Shutdown => {
                    info!("Shutdown requested");
                    break;
                }
            }
        }

        if matches!(self.recorder.status(), SessionStatus::Recording { .. }) {
            warn!("Stopping active recording before shutdown");
            let report = self.recorder.stop().await?;
            info!(
                session_id = %report.session_id,
                frames_written = report.capture.frames_written,
                "Recording finalized on shutdown"
            );
        }

        info!("Screen recorder controller shut down");

        Ok(())
    }

    async fn select_full_screen(&mut self) {
        match self.recorder.select_full_screen().await {
            Ok(region) => {
                let (width, height) = (region.width(), region.height());
                self.set_selection(RecorderStatus::FullScreen { width, height });
                self.notify(Notice::info(format!(
                    "Full screen selected: {}x{} pixels",
                    width, height
                )));
            }
            Err(e) => self.reject(e, "Failed to select full screen"),
        }
    }

    fn arm_region(&mut self, region: BoundingBox) {
        match self.recorder.arm(region) {
            Ok(()) => self.set_selection(RecorderStatus::AreaSelected {
                width: region.width(),
                height: region.height(),
            }),
            Err(e) => self.reject(e, "Failed to select area"),
        }
    }

    async fn start(&mut self, options: RecordingOptions) {
        match self.recorder.start(options).await {
            Ok(report) => {
                self.emit(UiEvent::Status(RecorderStatus::Recording));
                match report.audio {
                    AudioStatus::NoDevice => self.notify(Notice::warning(
                        "Audio device not found. Recording video only.",
                    )),
                    AudioStatus::Unavailable => self.notify(Notice::warning(
                        "Audio device could not be opened. Recording video only.",
                    )),
                    AudioStatus::Disabled | AudioStatus::Recording => {}
                }
            }
            Err(e) => self.reject(e, "Failed to start recording"),
        }
    }

    async fn stop(&mut self) {
        match self.recorder.stop().await {
            Ok(report) => {
                self.emit(UiEvent::Status(self.selection));
                match report.capture.stop {
                    CaptureStop::Cancelled => self.notify(Notice::info(format!(
                        "Recording saved as {}",
                        VIDEO_FILE_NAME
                    ))),
                    CaptureStop::Failed(reason) => self.notify(Notice::warning(format!(
                        "Recording ended early: {}. Saved {} frames as {}",
                        reason, report.capture.frames_written, VIDEO_FILE_NAME
                    ))),
                }
            }
            Err(e @ RecorderError::NotRecording { .. }) => {
                self.reject(e, "Failed to stop recording")
            }
            Err(e) => {
                // The session is over even when finalizing failed.
                self.emit(UiEvent::Status(self.selection));
                self.reject(e, "Failed to stop recording");
            }
        }
    }

    fn set_selection(&mut self, status: RecorderStatus) {
        self.selection = status;
        self.emit(UiEvent::Status(status));
    }

    /// Report a refused or failed command to the user.
    fn reject(&self, e: RecorderError, context: &str) {
        let notice = match &e {
            RecorderError::NoSelection { .. } => {
                Notice::warning("Please select an area or full screen first!")
            }
            RecorderError::AlreadyRecording { .. } => Notice::warning("Already recording!"),
            RecorderError::NotRecording { .. } => Notice::warning("Not recording!"),
            other => {
                error!(error = ?other, "{}", context);
                Notice::error(format!("{}: {}", context, other))
            }
        };
        self.notify(notice);
    }

    fn notify(&self, notice: Notice) {
        self.emit(UiEvent::Notice(notice));
    }

    fn emit(&self, event: UiEvent) {
        if self.event_tx.send(event).is_err() {
            debug!("Control panel closed, dropping UI event");
            return;
        }
        self.repaint.request_repaint();
    }
}
