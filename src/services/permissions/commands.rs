use crate::services::permissions::PermissionSet;
use crate::state::app_state::AppState;

/// Permissions as resolved at mount; all undetermined before that.
#[tauri::command]
pub fn get_permissions(state: tauri::State<'_, AppState>) -> PermissionSet {
    state.screen.permissions()
}
