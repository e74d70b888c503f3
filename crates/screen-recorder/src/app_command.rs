use screen_recorder_core::{BoundingBox, RecordingOptions};

/// Commands sent from the control panel to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Select the whole primary display.
    SelectFullScreen,
    /// Use a region dragged on the overlay.
    ArmRegion {
        /// Region in physical screen pixels.
        region: BoundingBox,
    },
    /// Start recording the selected region.
    Start {
        /// Quality and audio choices at the time of the click.
        options: RecordingOptions,
    },
    /// Stop the current recording.
    Stop,
    /// Stop any recording and exit the controller.
    Shutdown,
}
