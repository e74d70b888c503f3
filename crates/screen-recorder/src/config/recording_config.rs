use crate::config::{default_record_audio, quality_or_default};

use screen_recorder_core::QualityPreset;

use serde::{Deserialize, Serialize};

/// Initial control panel choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingConfig {
    /// Preset selected when the app opens.
    #[serde(default, deserialize_with = "quality_or_default")]
    pub default_quality: QualityPreset,
    /// Whether "Record PC Audio" starts checked.
    #[serde(default = "default_record_audio")]
    pub record_audio: bool,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            default_quality: QualityPreset::default(),
            record_audio: default_record_audio(),
        }
    }
}
