//! Capture/review state machine for the recorder screen.
//!
//! All screen state lives in [`RecorderMachine`] and changes only through its
//! named transitions. Every transition checks its own guard and leaves the
//! state untouched when it rejects, whatever the frontend happens to show.
//! Async work is split into a `begin_*` step, the platform call (made by the
//! caller without holding the machine), and a `finish_*` step.

use serde::Serialize;

use crate::capture::media::MediaDescriptor;
use crate::error::RecorderError;
use crate::screen::view::{PendingAction, ScreenSnapshot, ScreenView, CAMERA_DENIED_MESSAGE};
use crate::services::permissions::PermissionSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Capturing,
    Reviewing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordingStatus {
    #[default]
    Idle,
    Recording,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GateState {
    Unresolved,
    Resolving,
    Resolved,
}

#[derive(Debug)]
pub struct RecorderMachine {
    gate: GateState,
    permissions: PermissionSet,
    status: RecordingStatus,
    stop_requested: bool,
    media: Option<MediaDescriptor>,
    pending: Option<PendingAction>,
    notice: Option<String>,
}

impl Default for RecorderMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl RecorderMachine {
    pub fn new() -> Self {
        Self {
            gate: GateState::Unresolved,
            permissions: PermissionSet::default(),
            status: RecordingStatus::Idle,
            stop_requested: false,
            media: None,
            pending: None,
            notice: None,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.media.is_some() {
            Phase::Reviewing
        } else {
            Phase::Capturing
        }
    }

    pub fn status(&self) -> RecordingStatus {
        self.status
    }

    pub fn permissions(&self) -> PermissionSet {
        self.permissions
    }

    pub fn media(&self) -> Option<&MediaDescriptor> {
        self.media.as_ref()
    }

    pub fn pending(&self) -> Option<PendingAction> {
        self.pending
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    // ---- permission gate ----

    /// Returns true when the caller should go and query permissions. Only the
    /// first mount does; later mounts reuse whatever that one produced.
    pub fn begin_mount(&mut self) -> bool {
        if self.gate != GateState::Unresolved {
            return false;
        }
        self.gate = GateState::Resolving;
        true
    }

    pub fn finish_mount(&mut self, permissions: PermissionSet) {
        if self.gate == GateState::Resolved {
            log::warn!("Ignoring second permission resolution");
            return;
        }
        self.permissions = permissions;
        self.gate = GateState::Resolved;
    }

    fn is_gate_resolved(&self) -> bool {
        self.gate == GateState::Resolved && self.permissions.is_resolved()
    }

    fn ensure_main(&self) -> Result<(), RecorderError> {
        if !self.is_gate_resolved() {
            return Err(RecorderError::PermissionsPending);
        }
        if !self.permissions.camera.is_granted() {
            return Err(RecorderError::PermissionDenied("camera".into()));
        }
        Ok(())
    }

    // ---- capturing ----

    pub fn can_record(&self) -> bool {
        self.ensure_main().is_ok()
            && self.media.is_none()
            && self.status == RecordingStatus::Idle
            && self.pending.is_none()
    }

    pub fn begin_recording(&mut self) -> Result<(), RecorderError> {
        self.ensure_main()?;
        if self.status == RecordingStatus::Recording {
            return Err(RecorderError::RecordingInProgress);
        }
        if self.media.is_some() {
            return Err(RecorderError::MediaPending);
        }

        self.status = RecordingStatus::Recording;
        self.stop_requested = false;
        self.notice = None;
        Ok(())
    }

    /// Returns true on the first stop request for the current recording, which
    /// is when the device should be signalled.
    pub fn request_stop(&mut self) -> Result<bool, RecorderError> {
        if self.status != RecordingStatus::Recording {
            return Err(RecorderError::RecordingNotActive);
        }
        if self.stop_requested {
            return Ok(false);
        }
        self.stop_requested = true;
        Ok(true)
    }

    /// Settle the in-flight capture. A failed capture is recorded in the
    /// notice and leaves the screen capturing.
    pub fn finish_recording(
        &mut self,
        outcome: Result<MediaDescriptor, RecorderError>,
    ) -> Result<Phase, RecorderError> {
        if self.status != RecordingStatus::Recording {
            return Err(RecorderError::RecordingNotActive);
        }
        self.status = RecordingStatus::Idle;
        self.stop_requested = false;

        match outcome {
            Ok(media) => {
                log::debug!("Holding recording {} for review", media.uri);
                self.media = Some(media);
            }
            Err(e) => {
                log::error!("Error while recording video: {}", e);
                self.notice = Some(e.to_string());
            }
        }
        Ok(self.phase())
    }

    // ---- reviewing ----

    fn ensure_reviewable(&self) -> Result<&MediaDescriptor, RecorderError> {
        self.ensure_main()?;
        if self.pending.is_some() {
            return Err(RecorderError::ActionInFlight);
        }
        self.media.as_ref().ok_or(RecorderError::NoMedia)
    }

    pub fn discard(&mut self) -> Result<MediaDescriptor, RecorderError> {
        self.ensure_reviewable()?;
        self.notice = None;
        self.media.take().ok_or(RecorderError::NoMedia)
    }

    pub fn can_save(&self) -> bool {
        self.permissions.media_library.is_granted()
    }

    pub fn begin_share(&mut self) -> Result<MediaDescriptor, RecorderError> {
        let media = self.ensure_reviewable()?.clone();
        self.pending = Some(PendingAction::Share);
        self.notice = None;
        Ok(media)
    }

    pub fn begin_save(&mut self) -> Result<MediaDescriptor, RecorderError> {
        let media = self.ensure_reviewable()?.clone();
        if !self.can_save() {
            return Err(RecorderError::PermissionDenied("media library".into()));
        }
        self.pending = Some(PendingAction::Save);
        self.notice = None;
        Ok(media)
    }

    /// Settle a share or save. Success consumes the recording; failure keeps it
    /// so the user can try again. Returns whether the recording was consumed.
    pub fn finish_action(
        &mut self,
        action: PendingAction,
        result: Result<(), RecorderError>,
    ) -> Result<bool, RecorderError> {
        if self.pending != Some(action) {
            return Err(RecorderError::NoMedia);
        }
        self.pending = None;

        match result {
            Ok(()) => {
                self.media = None;
                Ok(true)
            }
            Err(RecorderError::ShareCancelled) => {
                log::info!("Share cancelled, keeping recording");
                Ok(false)
            }
            Err(e) => {
                log::error!("{:?} failed, keeping recording: {}", action, e);
                self.notice = Some(e.to_string());
                Ok(false)
            }
        }
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    // ---- rendering ----

    pub fn view(&self) -> ScreenView {
        if !self.is_gate_resolved() {
            return ScreenView::RequestingPermissions;
        }
        if !self.permissions.camera.is_granted() {
            return ScreenView::PermissionDenied {
                message: CAMERA_DENIED_MESSAGE.into(),
            };
        }

        match &self.media {
            Some(media) => ScreenView::Review {
                media: media.clone(),
                can_share: self.pending.is_none(),
                can_save: self.pending.is_none() && self.can_save(),
                can_discard: self.pending.is_none(),
                pending: self.pending,
            },
            None => ScreenView::Capture {
                recording: self.status == RecordingStatus::Recording,
                stopping: self.stop_requested,
                can_record: self.can_record(),
                audio_enabled: self.permissions.microphone.is_granted(),
            },
        }
    }

    pub fn snapshot(&self) -> ScreenSnapshot {
        ScreenSnapshot {
            view: self.view(),
            notice: self.notice.clone(),
        }
    }
}
