use crate::capture::config::CaptureOptions;
use crate::error::RecorderError;
use crate::screen::ScreenSnapshot;
use crate::state::app_state::AppState;

/// Resolves once the recording has finished, early or at the duration ceiling.
#[tauri::command]
pub async fn record_video(
    state: tauri::State<'_, AppState>,
) -> Result<ScreenSnapshot, RecorderError> {
    let screen = state.screen.clone();
    screen.record().await
}

#[tauri::command]
pub async fn stop_recording(
    state: tauri::State<'_, AppState>,
) -> Result<ScreenSnapshot, RecorderError> {
    let screen = state.screen.clone();
    screen.stop().await
}

#[tauri::command]
pub fn get_capture_options(state: tauri::State<'_, AppState>) -> CaptureOptions {
    state.screen.options().clone()
}
