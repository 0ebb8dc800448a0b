use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::capture::config::CaptureOptions;
use crate::capture::device::CaptureDevice;
use crate::error::RecorderError;
use crate::events;
use crate::screen::machine::{Phase, RecorderMachine};
use crate::screen::view::{PendingAction, ScreenSnapshot};
use crate::services::media::MediaSink;
use crate::services::permissions::gate::PermissionGate;
use crate::services::permissions::{PermissionProvider, PermissionSet};

/// Receives every state change the screen goes through.
pub trait ScreenObserver: Send + Sync {
    fn notify(&self, event: &'static str, snapshot: &ScreenSnapshot);
}

/// Observer that drops everything, for embedders that poll `snapshot`.
pub struct NoopObserver;

impl ScreenObserver for NoopObserver {
    fn notify(&self, _event: &'static str, _snapshot: &ScreenSnapshot) {}
}

/// Collaborators the screen drives.
pub struct Platform {
    pub permissions: Arc<dyn PermissionProvider>,
    pub device: Arc<dyn CaptureDevice>,
    pub sink: Arc<dyn MediaSink>,
    pub observer: Arc<dyn ScreenObserver>,
}

/// The recorder screen: the state machine plus the platform calls around it.
///
/// Guard rejections come back as `Err`. Failures of the platform itself are
/// contained: they are logged, shown through the notice, and the returned
/// snapshot reflects the recovered state.
pub struct RecorderScreen {
    machine: Mutex<RecorderMachine>,
    platform: Platform,
    options: CaptureOptions,
}

impl RecorderScreen {
    pub fn new(platform: Platform, options: CaptureOptions) -> Self {
        Self {
            machine: Mutex::new(RecorderMachine::new()),
            platform,
            options,
        }
    }

    pub fn options(&self) -> &CaptureOptions {
        &self.options
    }

    pub fn permissions(&self) -> PermissionSet {
        self.machine().permissions()
    }

    fn machine(&self) -> MutexGuard<'_, RecorderMachine> {
        self.machine.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: &'static str) -> ScreenSnapshot {
        let snapshot = self.snapshot();
        self.platform.observer.notify(event, &snapshot);
        if event != events::SCREEN_CHANGED {
            self.platform.observer.notify(events::SCREEN_CHANGED, &snapshot);
        }
        snapshot
    }

    pub fn snapshot(&self) -> ScreenSnapshot {
        self.machine().snapshot()
    }

    /// Resolve permissions once. Later calls return the current state.
    pub async fn mount(&self) -> ScreenSnapshot {
        if !self.machine().begin_mount() {
            return self.snapshot();
        }

        let permissions = PermissionGate::resolve(self.platform.permissions.as_ref()).await;
        self.machine().finish_mount(permissions);
        self.emit(events::PERMISSION_RESOLVED)
    }

    /// Record until the device finishes, either at the duration ceiling or
    /// after `stop`.
    pub async fn record(&self) -> Result<ScreenSnapshot, RecorderError> {
        self.machine().begin_recording()?;
        self.emit(events::RECORDING_STARTED);

        let outcome = self.platform.device.start_capture(&self.options).await;
        let phase = self.machine().finish_recording(outcome)?;

        Ok(match phase {
            Phase::Reviewing => self.emit(events::RECORDING_COMPLETED),
            Phase::Capturing => self.emit(events::RECORDING_FAILED),
        })
    }

    pub async fn stop(&self) -> Result<ScreenSnapshot, RecorderError> {
        let first_request = self.machine().request_stop()?;
        if first_request {
            log::info!("Stopping recording early");
            self.emit(events::SCREEN_CHANGED);
            if let Err(e) = self.platform.device.stop_capture().await {
                log::warn!("Failed to signal capture device to stop: {}", e);
            }
        }
        Ok(self.snapshot())
    }

    pub fn discard(&self) -> Result<ScreenSnapshot, RecorderError> {
        let media = self.machine().discard()?;
        log::info!("Discarded recording {}", media.uri);
        Ok(self.emit(events::MEDIA_DISCARDED))
    }

    pub async fn share(&self) -> Result<ScreenSnapshot, RecorderError> {
        let media = self.machine().begin_share()?;
        self.emit(events::SCREEN_CHANGED);

        let result = self.platform.sink.share(&media).await;
        self.settle(PendingAction::Share, result, events::MEDIA_SHARED)
    }

    /// Save to the library. Rejected with no platform call when the library
    /// permission was not granted.
    pub async fn save(&self) -> Result<ScreenSnapshot, RecorderError> {
        let media = self.machine().begin_save()?;
        self.emit(events::SCREEN_CHANGED);

        let result = self.platform.sink.save_to_library(&media).await;
        self.settle(PendingAction::Save, result, events::MEDIA_SAVED)
    }

    fn settle(
        &self,
        action: PendingAction,
        result: Result<(), RecorderError>,
        success_event: &'static str,
    ) -> Result<ScreenSnapshot, RecorderError> {
        let consumed = self.machine().finish_action(action, result)?;
        Ok(if consumed {
            self.emit(success_event)
        } else if self.machine().notice().is_some() {
            self.emit(events::MEDIA_ACTION_FAILED)
        } else {
            self.emit(events::SCREEN_CHANGED)
        })
    }

    pub fn dismiss_notice(&self) -> ScreenSnapshot {
        self.machine().dismiss_notice();
        self.emit(events::SCREEN_CHANGED)
    }
}
