pub mod library;

#[cfg(feature = "app")]
pub mod commands;
#[cfg(feature = "app")]
pub mod desktop;

use async_trait::async_trait;

use crate::capture::media::MediaDescriptor;
use crate::error::RecorderError;

/// Where a finished recording goes once the user is done reviewing it.
#[async_trait]
pub trait MediaSink: Send + Sync {
    /// Hand the recording to the platform share flow. A user backing out of
    /// the flow is reported as `RecorderError::ShareCancelled`.
    async fn share(&self, media: &MediaDescriptor) -> Result<(), RecorderError>;

    async fn save_to_library(&self, media: &MediaDescriptor) -> Result<(), RecorderError>;
}
