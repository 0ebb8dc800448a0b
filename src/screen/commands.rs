use crate::config::AppConfig;
use crate::error::RecorderError;
use crate::screen::ScreenSnapshot;
use crate::state::app_state::AppState;

#[tauri::command]
pub async fn mount_screen(
    state: tauri::State<'_, AppState>,
) -> Result<ScreenSnapshot, RecorderError> {
    let screen = state.screen.clone();
    Ok(screen.mount().await)
}

#[tauri::command]
pub fn get_screen(state: tauri::State<'_, AppState>) -> ScreenSnapshot {
    state.screen.snapshot()
}

#[tauri::command]
pub fn dismiss_notice(state: tauri::State<'_, AppState>) -> ScreenSnapshot {
    state.screen.dismiss_notice()
}

#[tauri::command]
pub fn get_config(state: tauri::State<'_, AppState>) -> AppConfig {
    state.config.clone()
}
