use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::capture::media::MediaDescriptor;
use crate::error::RecorderError;
use crate::services::permissions::PermissionStatus;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LibraryLocation {
    #[default]
    Default,
    Desktop,
    Custom { path: String },
}

// for platforms without a videos or desktop folder
fn fallback_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("VideoRecorder")
}

/// The user's video library on disk.
#[derive(Debug, Clone)]
pub struct LibraryManager {
    pub location: LibraryLocation,
}

impl LibraryManager {
    pub fn new(location: LibraryLocation) -> Self {
        Self { location }
    }

    /// Get the library directory path
    pub fn library_dir(&self) -> PathBuf {
        match &self.location {
            LibraryLocation::Default => dirs::video_dir()
                .map(|dir| dir.join("VideoRecorder"))
                .unwrap_or_else(fallback_dir),
            LibraryLocation::Desktop => dirs::desktop_dir().unwrap_or_else(fallback_dir),
            LibraryLocation::Custom { path } => PathBuf::from(path),
        }
    }

    /// Generate a filename for a saved recording
    pub fn generate_filename(&self, extension: &str) -> String {
        let now = chrono::Local::now();
        format!("Recording {}.{}", now.format("%Y-%m-%d at %H.%M.%S"), extension)
    }

    /// Whether recordings can be written into the library.
    pub async fn check_writable(&self) -> PermissionStatus {
        let dir = self.library_dir();
        if let Err(e) = tokio::fs::create_dir_all(&dir).await {
            log::warn!("Library directory {} not creatable: {}", dir.display(), e);
            return PermissionStatus::Denied;
        }
        match tokio::fs::metadata(&dir).await {
            Ok(meta) if !meta.permissions().readonly() => PermissionStatus::Authorized,
            Ok(_) => PermissionStatus::Denied,
            Err(e) => {
                log::warn!("Library directory {} not readable: {}", dir.display(), e);
                PermissionStatus::Denied
            }
        }
    }

    /// Copy a recording into the library, returning where it landed.
    pub async fn save(&self, media: &MediaDescriptor) -> Result<PathBuf, RecorderError> {
        let source = media.local_path().ok_or_else(|| {
            RecorderError::SaveFailed(format!("{} is not a local file", media.uri))
        })?;

        let dir = self.library_dir();
        tokio::fs::create_dir_all(&dir).await?;
        let target = unique_path(&dir, &self.generate_filename(media.extension())).await;

        tokio::fs::copy(&source, &target).await.map_err(|e| {
            RecorderError::SaveFailed(format!(
                "copying {} to {}: {}",
                source.display(),
                target.display(),
                e
            ))
        })?;
        log::info!("Saved recording to {}", target.display());
        Ok(target)
    }
}

/// Avoid clobbering a recording saved within the same second.
async fn unique_path(dir: &Path, filename: &str) -> PathBuf {
    let candidate = dir.join(filename);
    if !tokio::fs::try_exists(&candidate).await.unwrap_or(false) {
        return candidate;
    }

    let (stem, ext) = match filename.rsplit_once('.') {
        Some((stem, ext)) => (stem, format!(".{}", ext)),
        None => (filename, String::new()),
    };
    let mut n = 2;
    loop {
        let candidate = dir.join(format!("{} ({}){}", stem, n, ext));
        if !tokio::fs::try_exists(&candidate).await.unwrap_or(false) {
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn library_in(dir: &Path) -> LibraryManager {
        LibraryManager::new(LibraryLocation::Custom {
            path: dir.join("Library").display().to_string(),
        })
    }

    #[test]
    fn filename_is_timestamped() {
        let library = LibraryManager::new(LibraryLocation::Default);
        let name = library.generate_filename("mp4");
        assert!(name.starts_with("Recording "));
        assert!(name.contains(" at "));
        assert!(name.ends_with(".mp4"));
    }

    #[test]
    fn builtin_locations_never_resolve_to_the_working_directory() {
        assert!(fallback_dir().is_absolute());
        assert!(fallback_dir().ends_with("VideoRecorder"));
        for location in [LibraryLocation::Default, LibraryLocation::Desktop] {
            let dir = LibraryManager::new(location).library_dir();
            assert!(dir.is_absolute(), "{} is relative", dir.display());
        }
    }

    #[tokio::test]
    async fn save_copies_and_keeps_source() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("recording-1.mp4");
        tokio::fs::write(&source, b"not really a video").await.unwrap();

        let library = library_in(dir.path());
        let media = MediaDescriptor::from_path(&source);
        let first = library.save(&media).await.unwrap();
        let second = library.save(&media).await.unwrap();

        assert_ne!(first, second);
        assert!(first.starts_with(library.library_dir()));
        assert_eq!(
            tokio::fs::read(&second).await.unwrap(),
            b"not really a video"
        );
        assert!(source.exists());
    }

    #[tokio::test]
    async fn save_rejects_non_local_uri() {
        let dir = tempfile::tempdir().unwrap();
        let library = library_in(dir.path());
        let media = MediaDescriptor::new("content://media/7");
        assert!(matches!(
            library.save(&media).await,
            Err(RecorderError::SaveFailed(_))
        ));
    }

    #[tokio::test]
    async fn save_reports_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let library = library_in(dir.path());
        let media = MediaDescriptor::from_path(&dir.path().join("gone.mp4"));
        assert!(matches!(
            library.save(&media).await,
            Err(RecorderError::SaveFailed(_))
        ));
    }
}
