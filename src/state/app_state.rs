use std::sync::Arc;

use tauri::AppHandle;

use crate::capture::ffmpeg::FfmpegCamera;
use crate::config::AppConfig;
use crate::screen::{Platform, RecorderScreen};
use crate::services::media::desktop::DesktopSink;
use crate::services::media::library::LibraryManager;
use crate::services::permissions::system::SystemPermissions;
use crate::state::bridge::EventBridge;

/// Global application state managed by Tauri
pub struct AppState {
    pub screen: Arc<RecorderScreen>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(app: AppHandle, config: AppConfig) -> Self {
        let library = LibraryManager::new(config.library.clone());
        log::info!("Saving recordings to {}", library.library_dir().display());

        let platform = Platform {
            permissions: Arc::new(SystemPermissions::new(
                config.camera.clone(),
                library.clone(),
            )),
            device: Arc::new(FfmpegCamera::new(config.camera.clone())),
            sink: Arc::new(DesktopSink::new(app.clone(), library)),
            observer: Arc::new(EventBridge::new(app)),
        };

        Self {
            screen: Arc::new(RecorderScreen::new(platform, config.capture.clone())),
            config,
        }
    }
}
