pub mod capture;
pub mod config;
pub mod error;
pub mod events;
pub mod screen;
pub mod services;
#[cfg(feature = "app")]
pub mod state;

pub use config::AppConfig;
pub use error::RecorderError;
pub use screen::{RecorderScreen, ScreenSnapshot, ScreenView};

/// Install the `env_logger` backend for the `log` macros. Safe to call twice.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

#[cfg(feature = "app")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    use tauri::Manager;

    init_logging();
    let config = AppConfig::load();

    tauri::Builder::default()
        .plugin(tauri_plugin_notification::init())
        .plugin(tauri_plugin_opener::init())
        .setup(move |app| {
            app.manage(state::app_state::AppState::new(app.handle().clone(), config));
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            screen::commands::mount_screen,
            screen::commands::get_screen,
            screen::commands::dismiss_notice,
            screen::commands::get_config,
            capture::commands::record_video,
            capture::commands::stop_recording,
            capture::commands::get_capture_options,
            services::media::commands::discard_video,
            services::media::commands::share_video,
            services::media::commands::save_video,
            services::permissions::commands::get_permissions,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
