mod backend;
mod recorder;
mod state;

pub use {
    backend::{MediaBackend, SystemBackend},
    recorder::{AUDIO_JOIN_TIMEOUT, Recorder},
    state::{
        AudioReport, AudioStatus, RecordingOptions, SessionStatus, StartReport, StopReport,
    },
};
