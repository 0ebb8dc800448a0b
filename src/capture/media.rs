use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const FILE_SCHEME: &str = "file://";

/// Handle to a finished recording. The URI is owned by whoever produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaDescriptor {
    pub id: String,
    pub uri: String,
    pub created_at: String,
    pub mime_type: String,
}

impl MediaDescriptor {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            uri: uri.into(),
            created_at: Utc::now().to_rfc3339(),
            mime_type: "video/mp4".into(),
        }
    }

    pub fn from_path(path: &Path) -> Self {
        Self::new(format!("{}{}", FILE_SCHEME, path.display()))
    }

    /// Filesystem location of the recording, if the URI points at one.
    pub fn local_path(&self) -> Option<PathBuf> {
        self.uri
            .strip_prefix(FILE_SCHEME)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
    }

    pub fn extension(&self) -> &str {
        match self.mime_type.as_str() {
            "video/quicktime" => "mov",
            "video/webm" => "webm",
            _ => "mp4",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_uri_resolves_to_local_path() {
        let media = MediaDescriptor::from_path(Path::new("/tmp/recording-1.mp4"));
        assert_eq!(media.uri, "file:///tmp/recording-1.mp4");
        assert_eq!(
            media.local_path(),
            Some(PathBuf::from("/tmp/recording-1.mp4"))
        );
    }

    #[test]
    fn opaque_uri_has_no_local_path() {
        let media = MediaDescriptor::new("content://media/external/video/42");
        assert_eq!(media.local_path(), None);
        assert_eq!(media.extension(), "mp4");
    }

    #[test]
    fn each_descriptor_gets_its_own_id() {
        let a = MediaDescriptor::new("file://a.mp4");
        let b = MediaDescriptor::new("file://a.mp4");
        assert_ne!(a.id, b.id);
    }
}
