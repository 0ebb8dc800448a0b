use tauri::{AppHandle, Emitter};
use tauri_plugin_notification::NotificationExt;

use crate::events;
use crate::screen::{ScreenObserver, ScreenSnapshot};

/// Forwards screen changes to the webview, and failures to the system tray
/// notifications so they are seen even when the window is in the background.
pub struct EventBridge {
    app: AppHandle,
}

impl EventBridge {
    pub fn new(app: AppHandle) -> Self {
        Self { app }
    }
}

impl ScreenObserver for EventBridge {
    fn notify(&self, event: &'static str, snapshot: &ScreenSnapshot) {
        if let Err(e) = self.app.emit(event, snapshot) {
            log::warn!("Failed to emit {}: {}", event, e);
        }

        if !events::is_failure(event) {
            return;
        }
        if let Some(message) = &snapshot.notice {
            let shown = self
                .app
                .notification()
                .builder()
                .title("Video Recorder")
                .body(message)
                .show();
            if let Err(e) = shown {
                log::warn!("Failed to show notification: {}", e);
            }
        }
    }
}
