pub mod gate;
pub mod system;

#[cfg(feature = "app")]
pub mod commands;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::RecorderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionStatus {
    Authorized,
    Denied,
    Restricted,
    #[default]
    NotDetermined,
}

impl PermissionStatus {
    pub fn is_granted(&self) -> bool {
        matches!(self, PermissionStatus::Authorized)
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self, PermissionStatus::NotDetermined)
    }
}

/// Authorization for every capability the screen uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PermissionSet {
    pub camera: PermissionStatus,
    pub microphone: PermissionStatus,
    pub media_library: PermissionStatus,
}

impl PermissionSet {
    pub fn new(
        camera: PermissionStatus,
        microphone: PermissionStatus,
        media_library: PermissionStatus,
    ) -> Self {
        Self {
            camera,
            microphone,
            media_library,
        }
    }

    /// Camera and microphone both answered; the media library does not hold up the screen.
    pub fn is_resolved(&self) -> bool {
        self.camera.is_resolved() && self.microphone.is_resolved()
    }
}

/// Source of the platform's authorization answers.
#[async_trait]
pub trait PermissionProvider: Send + Sync {
    async fn request_camera(&self) -> Result<PermissionStatus, RecorderError>;
    async fn request_microphone(&self) -> Result<PermissionStatus, RecorderError>;
    async fn request_media_library(&self) -> Result<PermissionStatus, RecorderError>;
}
