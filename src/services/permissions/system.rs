use async_trait::async_trait;

use crate::capture::ffmpeg::{CameraConfig, InputFormat};
use crate::error::RecorderError;
use crate::services::media::library::LibraryManager;
use crate::services::permissions::{PermissionProvider, PermissionStatus};

/// Desktop permission probe.
///
/// Desktop platforms have no prompt to raise, so each capability is probed
/// for actual access instead: the camera device node must open for reading and
/// the library directory must be writable.
pub struct SystemPermissions {
    camera: CameraConfig,
    library: LibraryManager,
}

impl SystemPermissions {
    pub fn new(camera: CameraConfig, library: LibraryManager) -> Self {
        Self { camera, library }
    }
}

#[async_trait]
impl PermissionProvider for SystemPermissions {
    async fn request_camera(&self) -> Result<PermissionStatus, RecorderError> {
        if InputFormat::current() != InputFormat::V4l2 {
            // TODO: AVCaptureDevice.authorizationStatus(for: .video) on macOS
            return Ok(PermissionStatus::Authorized);
        }

        let device = self.camera.video_device();
        match tokio::fs::OpenOptions::new().read(true).open(&device).await {
            Ok(_) => Ok(PermissionStatus::Authorized),
            Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                Ok(PermissionStatus::Denied)
            }
            Err(e) => {
                log::warn!("Camera device {} unavailable: {}", device, e);
                Ok(PermissionStatus::Restricted)
            }
        }
    }

    async fn request_microphone(&self) -> Result<PermissionStatus, RecorderError> {
        // TODO: AVCaptureDevice.authorizationStatus(for: .audio) on macOS
        Ok(PermissionStatus::Authorized)
    }

    async fn request_media_library(&self) -> Result<PermissionStatus, RecorderError> {
        Ok(self.library.check_writable().await)
    }
}
