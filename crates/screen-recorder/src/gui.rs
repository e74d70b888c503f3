use crate::{
    AppCommand, AppError, AppResult, RecorderStatus,
    config::RecordingConfig,
    overlay::RegionOverlay,
    ui_event::{Notice, UiEvent},
};

use screen_recorder_core::{QualityPreset, RecordingOptions, SelectionOutcome, VIDEO_FILE_NAME};

use std::{panic::Location, sync::mpsc::Receiver};

use eframe::egui::{self, Align2, Button, RichText, Vec2};
use error_location::ErrorLocation;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

const BUTTON_SIZE: Vec2 = Vec2::new(220.0, 32.0);

/// The main window: selection buttons, options, start/stop and status.
///
/// Never blocks. Commands go to the controller with `try_send`; results
/// come back as [`UiEvent`]s drained at the top of every frame.
pub struct ControlPanel {
    command_tx: mpsc::Sender<AppCommand>,
    event_rx: Receiver<UiEvent>,
    status: RecorderStatus,
    quality: QualityPreset,
    record_audio: bool,
    notice: Option<Notice>,
    overlay: Option<RegionOverlay>,
}

impl ControlPanel {
    pub(crate) fn new(
        defaults: &RecordingConfig,
        command_tx: mpsc::Sender<AppCommand>,
        event_rx: Receiver<UiEvent>,
    ) -> Self {
        Self {
            command_tx,
            event_rx,
            status: RecorderStatus::Ready,
            quality: defaults.default_quality,
            record_audio: defaults.record_audio,
            notice: None,
            overlay: None,
        }
    }

    fn drain_events(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            match event {
                UiEvent::Status(status) => self.status = status,
                UiEvent::Notice(notice) => self.notice = Some(notice),
            }
        }
    }

    #[track_caller]
    fn send(&self, command: AppCommand) -> AppResult<()> {
        self.command_tx
            .try_send(command)
            .map_err(|e| AppError::ChannelSendFailed {
                message: e.to_string(),
                location: ErrorLocation::from(Location::caller()),
            })
    }

    fn dispatch(&self, command: AppCommand) {
        if let Err(e) = self.send(command) {
            error!(error = ?e, "Failed to send command");
        }
    }

    fn finish_selection(&mut self, outcome: SelectionOutcome) {
        match outcome {
            SelectionOutcome::Selected(region) => {
                info!(%region, "Area selected");
                self.dispatch(AppCommand::ArmRegion { region });
            }
            SelectionOutcome::Rejected(e) => {
                self.notice = Some(Notice::warning(format!("Invalid selection: {}", e)));
            }
            SelectionOutcome::Cancelled => debug!("Area selection cancelled"),
        }
    }

    fn options(&self) -> RecordingOptions {
        RecordingOptions {
            quality: self.quality,
            record_audio: self.record_audio,
        }
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        let recording = self.status.is_recording();

        ui.vertical_centered(|ui| {
            ui.add_space(12.0);
            ui.heading("Screen Recorder");
            ui.add_space(16.0);

            let full_screen = ui.add_enabled(
                !recording,
                Button::new("Record Full Screen").min_size(BUTTON_SIZE),
            );
            if full_screen.clicked() {
                self.dispatch(AppCommand::SelectFullScreen);
            }

            let select_area = ui.add_enabled(
                !recording && self.overlay.is_none(),
                Button::new("Select Screen Area").min_size(BUTTON_SIZE),
            );
            if select_area.clicked() {
                self.overlay = Some(RegionOverlay::new());
            }

            ui.add_space(12.0);
            ui.checkbox(&mut self.record_audio, "Record PC Audio");

            ui.add_space(8.0);
            ui.label("Quality:");
            ui.horizontal(|ui| {
                for preset in QualityPreset::ALL {
                    ui.radio_value(&mut self.quality, preset, preset.label());
                }
            });

            ui.add_space(12.0);
            if ui
                .add(Button::new(RichText::new("Start Recording").strong()).min_size(BUTTON_SIZE))
                .clicked()
            {
                self.dispatch(AppCommand::Start {
                    options: self.options(),
                });
            }
            if ui
                .add(Button::new("Stop Recording").min_size(BUTTON_SIZE))
                .clicked()
            {
                self.dispatch(AppCommand::Stop);
            }

            ui.add_space(16.0);
            ui.label(self.status.to_string());
            ui.add_space(8.0);
            ui.small(format!("Video saved as: {}", VIDEO_FILE_NAME));
        });
    }

    fn notice_window(&mut self, ctx: &egui::Context) {
        let Some(notice) = &self.notice else {
            return;
        };

        let mut dismissed = false;
        egui::Window::new(notice.title())
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(&notice.text);
                ui.vertical_centered(|ui| {
                    if ui.button("OK").clicked() {
                        dismissed = true;
                    }
                });
            });

        if dismissed {
            self.notice = None;
        }
    }
}

impl eframe::App for ControlPanel {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_events();

        if let Some(overlay) = self.overlay.as_mut() {
            if let Some(outcome) = overlay.show(ctx) {
                self.overlay = None;
                self.finish_selection(outcome);
            }
        }

        egui::CentralPanel::default().show(ctx, |ui| self.controls(ui));

        self.notice_window(ctx);
    }
}
