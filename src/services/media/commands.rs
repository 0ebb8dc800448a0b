use crate::error::RecorderError;
use crate::screen::ScreenSnapshot;
use crate::state::app_state::AppState;

#[tauri::command]
pub fn discard_video(state: tauri::State<'_, AppState>) -> Result<ScreenSnapshot, RecorderError> {
    state.screen.discard()
}

#[tauri::command]
pub async fn share_video(
    state: tauri::State<'_, AppState>,
) -> Result<ScreenSnapshot, RecorderError> {
    let screen = state.screen.clone();
    screen.share().await
}

#[tauri::command]
pub async fn save_video(
    state: tauri::State<'_, AppState>,
) -> Result<ScreenSnapshot, RecorderError> {
    let screen = state.screen.clone();
    screen.save().await
}
