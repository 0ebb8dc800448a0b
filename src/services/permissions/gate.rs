use crate::error::RecorderError;
use crate::services::permissions::{PermissionProvider, PermissionSet, PermissionStatus};

/// One-shot permission resolution run when the screen mounts.
pub struct PermissionGate;

impl PermissionGate {
    /// Issue all three requests at once and wait for every answer.
    ///
    /// A request that errors is treated as a denial so the gate always settles.
    pub async fn resolve(provider: &dyn PermissionProvider) -> PermissionSet {
        let (camera, microphone, media_library) = tokio::join!(
            provider.request_camera(),
            provider.request_microphone(),
            provider.request_media_library(),
        );

        let set = PermissionSet::new(
            settle("camera", camera),
            settle("microphone", microphone),
            settle("media library", media_library),
        );
        log::info!(
            "Permissions resolved: camera={:?} microphone={:?} media_library={:?}",
            set.camera,
            set.microphone,
            set.media_library
        );
        set
    }
}

fn settle(capability: &str, answer: Result<PermissionStatus, RecorderError>) -> PermissionStatus {
    match answer {
        Ok(PermissionStatus::NotDetermined) => {
            log::warn!("{} permission left undetermined, treating as denied", capability);
            PermissionStatus::Denied
        }
        Ok(status) => {
            if !status.is_granted() {
                log::warn!("{} permission not granted: {:?}", capability, status);
            }
            status
        }
        Err(e) => {
            log::warn!("{} permission request failed: {}", capability, e);
            PermissionStatus::Denied
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct SlowProvider {
        calls: AtomicUsize,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    impl SlowProvider {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
            }
        }

        async fn answer(
            &self,
            status: Result<PermissionStatus, RecorderError>,
        ) -> Result<PermissionStatus, RecorderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            status
        }
    }

    #[async_trait]
    impl PermissionProvider for SlowProvider {
        async fn request_camera(&self) -> Result<PermissionStatus, RecorderError> {
            self.answer(Ok(PermissionStatus::Authorized)).await
        }

        async fn request_microphone(&self) -> Result<PermissionStatus, RecorderError> {
            self.answer(Err(RecorderError::PermissionDenied("microphone".into())))
                .await
        }

        async fn request_media_library(&self) -> Result<PermissionStatus, RecorderError> {
            self.answer(Ok(PermissionStatus::NotDetermined)).await
        }
    }

    #[tokio::test]
    async fn requests_run_concurrently_and_errors_become_denials() {
        let provider = SlowProvider::new();
        let set = PermissionGate::resolve(&provider).await;

        assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
        assert_eq!(provider.peak.load(Ordering::SeqCst), 3);
        assert_eq!(set.camera, PermissionStatus::Authorized);
        assert_eq!(set.microphone, PermissionStatus::Denied);
        assert_eq!(set.media_library, PermissionStatus::Denied);
        assert!(set.is_resolved());
    }
}
