use serde::{Deserialize, Serialize};

use crate::error::RecorderError;

/// Ceiling on a single recording, in seconds.
pub const DEFAULT_MAX_DURATION_SECS: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityPreset {
    Low,    // 720p
    Medium, // 1080p
    High,   // Native
}

impl QualityPreset {
    pub fn max_height(&self) -> u32 {
        match self {
            QualityPreset::Low => 720,
            QualityPreset::Medium => 1080,
            QualityPreset::High => u32::MAX,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QualityPreset::Low => "720p",
            QualityPreset::Medium => "1080p",
            QualityPreset::High => "native",
        }
    }
}

/// Options handed to the capture device for every recording.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureOptions {
    pub quality: QualityPreset,
    pub max_duration_secs: u32,
    pub muted: bool,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            max_duration_secs: DEFAULT_MAX_DURATION_SECS,
            muted: false,
        }
    }
}

impl CaptureOptions {
    pub fn validate(&self) -> Result<(), RecorderError> {
        if self.max_duration_secs == 0 {
            return Err(RecorderError::InvalidConfig(
                "max_duration_secs must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}
