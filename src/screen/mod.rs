pub mod controller;
pub mod machine;
pub mod view;

#[cfg(feature = "app")]
pub mod commands;

pub use controller::{NoopObserver, Platform, RecorderScreen, ScreenObserver};
pub use machine::{Phase, RecorderMachine, RecordingStatus};
pub use view::{PendingAction, ScreenSnapshot, ScreenView};
