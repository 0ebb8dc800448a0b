use async_trait::async_trait;

use crate::capture::config::CaptureOptions;
use crate::capture::media::MediaDescriptor;
use crate::error::RecorderError;

/// Camera that records one clip at a time.
#[async_trait]
pub trait CaptureDevice: Send + Sync {
    /// Records until the duration ceiling is hit or `stop_capture` is called,
    /// then resolves with the finished clip.
    async fn start_capture(&self, options: &CaptureOptions)
        -> Result<MediaDescriptor, RecorderError>;

    /// Asks an in-flight `start_capture` to finish early. No effect when idle.
    async fn stop_capture(&self) -> Result<(), RecorderError>;
}
