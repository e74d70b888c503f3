use std::fmt;

/// What the status label shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecorderStatus {
    /// Nothing selected.
    #[default]
    Ready,
    /// The whole display is selected.
    FullScreen {
        /// Display width in pixels.
        width: u32,
        /// Display height in pixels.
        height: u32,
    },
    /// A dragged region is selected.
    AreaSelected {
        /// Region width in pixels.
        width: u32,
        /// Region height in pixels.
        height: u32,
    },
    /// A session is running.
    Recording,
}

impl RecorderStatus {
    /// Whether a recording is in progress.
    pub fn is_recording(self) -> bool {
        matches!(self, Self::Recording)
    }
}

impl fmt::Display for RecorderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready => f.write_str("Ready"),
            Self::FullScreen { width, height } => {
                write!(f, "Full Screen: {}x{} px", width, height)
            }
            Self::AreaSelected { width, height } => {
                write!(f, "Area selected: {}x{} px", width, height)
            }
            Self::Recording => f.write_str("Recording..."),
        }
    }
}
