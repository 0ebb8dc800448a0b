use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum RecorderError {
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Permissions are still being requested")]
    PermissionsPending,

    #[error("Recording already in progress")]
    RecordingInProgress,

    #[error("Recording not active")]
    RecordingNotActive,

    #[error("A recorded video is waiting for review")]
    MediaPending,

    #[error("No recorded video to act on")]
    NoMedia,

    #[error("Another action on this video is still running")]
    ActionInFlight,

    #[error("Recording failed: {0}")]
    CaptureFailed(String),

    #[error("Sharing failed: {0}")]
    ShareFailed(String),

    #[error("Sharing cancelled")]
    ShareCancelled,

    #[error("Saving failed: {0}")]
    SaveFailed(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Serialize for RecorderError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
