use crate::config::default_output_directory;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where recordings are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving `screen_record.mp4` and `temp_audio.wav`.
    #[serde(default = "default_output_directory")]
    pub directory: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
        }
    }
}
