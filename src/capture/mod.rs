pub mod config;
pub mod device;
pub mod ffmpeg;
pub mod media;

#[cfg(feature = "app")]
pub mod commands;
