use serde::{Deserialize, Serialize};

use crate::capture::media::MediaDescriptor;

pub const CAMERA_DENIED_MESSAGE: &str =
    "Permission for camera not granted. Please allow camera access in settings.";

/// Media-sink call currently running for the held recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PendingAction {
    Share,
    Save,
}

/// What the frontend should render. Exactly one view is active at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ScreenView {
    RequestingPermissions,
    PermissionDenied {
        message: String,
    },
    Capture {
        recording: bool,
        stopping: bool,
        can_record: bool,
        audio_enabled: bool,
    },
    Review {
        media: MediaDescriptor,
        can_share: bool,
        can_save: bool,
        can_discard: bool,
        pending: Option<PendingAction>,
    },
}

impl ScreenView {
    pub fn name(&self) -> &'static str {
        match self {
            ScreenView::RequestingPermissions => "requesting_permissions",
            ScreenView::PermissionDenied { .. } => "permission_denied",
            ScreenView::Capture { .. } => "capture",
            ScreenView::Review { .. } => "review",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScreenSnapshot {
    #[serde(flatten)]
    pub view: ScreenView,
    /// Non-blocking error banner.
    pub notice: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_serializes_with_view_tag() {
        let snapshot = ScreenSnapshot {
            view: ScreenView::Capture {
                recording: false,
                stopping: false,
                can_record: true,
                audio_enabled: false,
            },
            notice: Some("Recording failed: boom".into()),
        };
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["view"], "capture");
        assert_eq!(json["can_record"], true);
        assert_eq!(json["notice"], "Recording failed: boom");
    }

    #[test]
    fn denied_view_carries_message() {
        let view = ScreenView::PermissionDenied {
            message: CAMERA_DENIED_MESSAGE.into(),
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["view"], "permission_denied");
        assert_eq!(view.name(), "permission_denied");
    }
}
