use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::capture::config::CaptureOptions;
use crate::capture::ffmpeg::CameraConfig;
use crate::error::RecorderError;
use crate::services::media::library::LibraryLocation;

/// Overrides the config file location.
pub const CONFIG_ENV: &str = "VIDEORECORDER_CONFIG";

const APP_DIR: &str = "VideoRecorder";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub capture: CaptureOptions,
    pub camera: CameraConfig,
    pub library: LibraryLocation,
}

impl AppConfig {
    pub fn config_path() -> PathBuf {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return PathBuf::from(path);
        }
        dirs::config_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(APP_DIR)
            .join(CONFIG_FILE)
    }

    /// Load from the default location. Never fails: a missing file gives the
    /// defaults and an unreadable one is logged and replaced by them.
    pub fn load() -> Self {
        let path = Self::config_path();
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Ignoring config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, RecorderError> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.capture.validate()?;
        Ok(config)
    }

    #[cfg(test)]
    fn save_to(&self, path: &Path) -> Result<(), RecorderError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
