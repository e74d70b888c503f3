#[allow(clippy::module_inception)]
mod config;
mod output_config;
mod recording_config;

pub(crate) use {
    config::Config, output_config::OutputConfig, recording_config::RecordingConfig,
};

use screen_recorder_core::QualityPreset;

use std::path::PathBuf;

use directories::UserDirs;
use serde::{Deserialize, Deserializer};
use tracing::warn;

pub(crate) const DEFAULT_RECORD_AUDIO: bool = false;

pub(crate) fn default_output_directory() -> PathBuf {
    UserDirs::new()
        .and_then(|dirs| dirs.video_dir().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."))
}

pub(crate) fn default_record_audio() -> bool {
    DEFAULT_RECORD_AUDIO
}

/// Accepts any preset label; unknown labels fall back to the default preset.
pub(crate) fn quality_or_default<'de, D>(deserializer: D) -> Result<QualityPreset, D::Error>
where
    D: Deserializer<'de>,
{
    let label = String::deserialize(deserializer)?;

    Ok(label.parse().unwrap_or_else(|e| {
        warn!(error = %e, "Falling back to default quality");
        QualityPreset::default()
    }))
}
