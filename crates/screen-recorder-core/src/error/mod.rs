use error_location::ErrorLocation;
use thiserror::Error;

/// Validation errors for a user-selected screen region.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionError {
    /// The dragged rectangle has zero width or zero height.
    #[error("Selected area has zero width or height ({width}x{height})")]
    ZeroArea {
        /// Width of the rejected rectangle.
        width: u32,
        /// Height of the rejected rectangle.
        height: u32,
    },
}

/// Recording errors with source location tracking.
#[derive(Error, Debug)]
pub enum RecorderError {
    /// `start` was requested before any region was selected.
    #[error("No region selected {location}")]
    NoSelection {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A recording session is already active.
    #[error("Already recording {location}")]
    AlreadyRecording {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// `stop` was requested while no session is active.
    #[error("Not recording {location}")]
    NotRecording {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The requested region is not a valid bounding box.
    #[error("Invalid region: {source} {location}")]
    InvalidRegion {
        /// Underlying validation error.
        #[source]
        source: RegionError,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// No display could be found to capture from.
    #[error("No monitor found {location}")]
    NoMonitorFound {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Grabbing pixels from the display failed.
    #[error("Screen capture failed: {reason} {location}")]
    CaptureFailed {
        /// Description of the capture failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The bounding box does not fit inside the captured display image.
    #[error(
        "Region ({x1},{y1})-({x2},{y2}) exceeds display bounds {display_width}x{display_height} {location}"
    )]
    RegionOutOfBounds {
        /// Left edge of the region.
        x1: u32,
        /// Top edge of the region.
        y1: u32,
        /// Right edge of the region.
        x2: u32,
        /// Bottom edge of the region.
        y2: u32,
        /// Width of the display image.
        display_width: u32,
        /// Height of the display image.
        display_height: u32,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Opening, writing or finalizing the video sink failed.
    #[error("Encoder error: {reason} {location}")]
    EncoderError {
        /// Description of the encoder error.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Audio device operation failed.
    #[error("Audio device error: {reason} {location}")]
    AudioDeviceError {
        /// Description of the device error.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Writing the waveform file failed.
    #[error("Failed to write waveform file: {reason} {location}")]
    WaveWriteError {
        /// Description of the write failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A background capture task panicked or was aborted.
    #[error("Background task failed: {reason} {location}")]
    TaskFailed {
        /// Description of the task failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

/// Result type alias using [`RecorderError`].
pub type Result<T> = std::result::Result<T, RecorderError>;
