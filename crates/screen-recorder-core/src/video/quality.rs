use crate::{region::BoundingBox, video::FrameSize};

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Output resolution tier. The captured region is rescaled to the preset's
/// height, and the width follows the region's aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum QualityPreset {
    /// 480 pixels high.
    #[serde(rename = "480p")]
    P480,
    /// 720 pixels high.
    #[default]
    #[serde(rename = "720p")]
    P720,
    /// 1080 pixels high.
    #[serde(rename = "1080p")]
    P1080,
}

impl QualityPreset {
    /// All presets, lowest first.
    pub const ALL: [QualityPreset; 3] = [Self::P480, Self::P720, Self::P1080];

    /// Nominal output height in pixels.
    pub fn target_height(self) -> u32 {
        match self {
            Self::P480 => 480,
            Self::P720 => 720,
            Self::P1080 => 1080,
        }
    }

    /// Encoded frame size for a region captured at this preset.
    ///
    /// Width is `round(height * aspect)`. Both dimensions are forced even
    /// by dropping one pixel, and never fall below 2.
    pub fn target_size(self, region: &BoundingBox) -> FrameSize {
        let height = self.target_height();
        let width = (f64::from(height) * region.aspect_ratio()).round() as u32;

        FrameSize::new(even_floor(width), even_floor(height))
    }

    /// Label shown in the UI and stored in the config file.
    pub fn label(self) -> &'static str {
        match self {
            Self::P480 => "480p",
            Self::P720 => "720p",
            Self::P1080 => "1080p",
        }
    }
}

fn even_floor(value: u32) -> u32 {
    (value - value % 2).max(2)
}

impl fmt::Display for QualityPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when parsing an unknown preset label.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown quality preset: {0:?} (expected 480p, 720p or 1080p)")]
pub struct UnknownPreset(pub String);

impl FromStr for QualityPreset {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownPreset(s.to_string()))
    }
}
