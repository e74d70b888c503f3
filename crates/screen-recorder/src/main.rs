//! Screen Recorder: record a region of the screen to MP4, with optional
//! audio to WAV, from a small control panel.

mod app_command;
mod config;
mod controller;
mod error;
mod gui;
mod overlay;
mod recorder_status;
mod ui_event;

pub(crate) use {
    app_command::AppCommand,
    controller::Controller,
    error::{AppError, Result as AppResult},
    gui::ControlPanel,
    recorder_status::RecorderStatus,
    ui_event::UiEvent,
};

use crate::config::Config;

use screen_recorder_core::{Recorder, SystemBackend};

use std::{panic::Location, path::PathBuf, sync::mpsc::Sender, thread::JoinHandle};

use eframe::egui;
use error_location::ErrorLocation;
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "screen_recorder=debug,screen_recorder_core=debug";

/// Application entry point.
fn main() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {:?}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(config) {
        error!(error = ?e, "Screen recorder exited with error");
        std::process::exit(1);
    }
}

fn run(config: Config) -> AppResult<()> {
    let (command_tx, command_rx) = mpsc::channel(32);
    let (event_tx, event_rx) = std::sync::mpsc::channel();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Screen Recorder")
            .with_inner_size([450.0, 500.0])
            .with_resizable(false),
        ..Default::default()
    };

    let mut controller_thread = None;
    let panel = ControlPanel::new(&config.recording, command_tx.clone(), event_rx);
    let output_dir = config.output.directory.clone();

    // The controller needs the egui context for repaints, so the runtime
    // thread starts once the window exists. The window stays on the main
    // thread.
    let result = eframe::run_native(
        "Screen Recorder",
        options,
        Box::new(|cc| {
            controller_thread = Some(spawn_controller(
                output_dir,
                command_rx,
                event_tx,
                cc.egui_ctx.clone(),
            ));
            Ok(Box::new(panel))
        }),
    );

    // Window closed: finalize any recording before exiting.
    if command_tx.blocking_send(AppCommand::Shutdown).is_err() {
        info!("Controller already stopped");
    }
    if let Some(handle) = controller_thread {
        if handle.join().is_err() {
            error!("Controller thread panicked");
        }
    }

    result.map_err(|e| AppError::UiError {
        reason: e.to_string(),
        location: ErrorLocation::from(Location::caller()),
    })
}

fn spawn_controller(
    output_dir: PathBuf,
    command_rx: mpsc::Receiver<AppCommand>,
    event_tx: Sender<UiEvent>,
    ctx: egui::Context,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        let rt = match tokio::runtime::Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                error!("Failed to create tokio runtime: {:?}", e);
                std::process::exit(1);
            }
        };

        rt.block_on(async {
            let recorder = Recorder::new(SystemBackend, output_dir);
            let controller = Controller::new(recorder, command_rx, event_tx, ctx);

            if let Err(e) = controller.run().await {
                error!(error = ?e, "Controller error");
            }
        });
    })
}
