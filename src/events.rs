/// Event name constants for Tauri backend -> frontend communication
pub const SCREEN_CHANGED: &str = "screen:changed";
pub const PERMISSION_RESOLVED: &str = "permission:resolved";
pub const RECORDING_STARTED: &str = "recording:started";
pub const RECORDING_COMPLETED: &str = "recording:completed";
pub const RECORDING_FAILED: &str = "recording:failed";
pub const MEDIA_SHARED: &str = "media:shared";
pub const MEDIA_SAVED: &str = "media:saved";
pub const MEDIA_DISCARDED: &str = "media:discarded";
pub const MEDIA_ACTION_FAILED: &str = "media:action-failed";

/// Events that carry a failure the user should hear about.
pub fn is_failure(event: &str) -> bool {
    matches!(event, RECORDING_FAILED | MEDIA_ACTION_FAILED)
}
