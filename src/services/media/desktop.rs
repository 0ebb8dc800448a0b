use async_trait::async_trait;
use tauri::AppHandle;
use tauri_plugin_opener::OpenerExt;

use crate::capture::media::MediaDescriptor;
use crate::error::RecorderError;
use crate::services::media::library::LibraryManager;
use crate::services::media::MediaSink;

/// Desktop media sink. Desktop has no share sheet, so sharing reveals the
/// recording in the file manager for the user to pass on.
pub struct DesktopSink {
    app: AppHandle,
    library: LibraryManager,
}

impl DesktopSink {
    pub fn new(app: AppHandle, library: LibraryManager) -> Self {
        Self { app, library }
    }
}

#[async_trait]
impl MediaSink for DesktopSink {
    async fn share(&self, media: &MediaDescriptor) -> Result<(), RecorderError> {
        let path = media.local_path().ok_or_else(|| {
            RecorderError::ShareFailed(format!("{} is not a local file", media.uri))
        })?;
        self.app
            .opener()
            .reveal_item_in_dir(&path)
            .map_err(|e| RecorderError::ShareFailed(e.to_string()))?;
        log::info!("Revealed {} for sharing", path.display());
        Ok(())
    }

    async fn save_to_library(&self, media: &MediaDescriptor) -> Result<(), RecorderError> {
        self.library.save(media).await.map(|_| ())
    }
}
