//! Desktop camera backed by an `ffmpeg` child process.
//!
//! The process records straight from the platform camera input into an MP4
//! under the cache directory. `-t` enforces the duration ceiling; stopping
//! early writes `q` to ffmpeg's stdin, which makes it finalize the file and
//! exit normally.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::process::{ChildStdin, Command};
use uuid::Uuid;

use crate::capture::config::CaptureOptions;
use crate::capture::device::CaptureDevice;
use crate::capture::media::MediaDescriptor;
use crate::error::RecorderError;

const STDERR_TAIL_LINES: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub ffmpeg_path: String,
    pub video_input: Option<String>,
    pub audio_input: Option<String>,
    pub output_dir: Option<PathBuf>,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: "ffmpeg".into(),
            video_input: None,
            audio_input: None,
            output_dir: None,
        }
    }
}

impl CameraConfig {
    pub fn video_device(&self) -> String {
        self.video_input
            .clone()
            .unwrap_or_else(|| InputFormat::current().default_video_input().into())
    }

    pub fn audio_device(&self) -> String {
        self.audio_input
            .clone()
            .unwrap_or_else(|| InputFormat::current().default_audio_input().into())
    }

    /// Where raw recordings land before they are shared or saved.
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("VideoRecorder")
        })
    }
}

/// ffmpeg demuxer used to read the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    V4l2,
    AvFoundation,
    DShow,
}

impl InputFormat {
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            InputFormat::AvFoundation
        } else if cfg!(target_os = "windows") {
            InputFormat::DShow
        } else {
            InputFormat::V4l2
        }
    }

    fn default_video_input(&self) -> &'static str {
        match self {
            InputFormat::V4l2 => "/dev/video0",
            InputFormat::AvFoundation => "0",
            InputFormat::DShow => "Integrated Camera",
        }
    }

    fn default_audio_input(&self) -> &'static str {
        match self {
            InputFormat::V4l2 => "default",
            InputFormat::AvFoundation => "0",
            InputFormat::DShow => "Microphone",
        }
    }
}

/// Build the ffmpeg argument list for one recording.
pub fn capture_args(
    config: &CameraConfig,
    options: &CaptureOptions,
    format: InputFormat,
    output: &Path,
) -> Vec<String> {
    let mut args: Vec<String> = ["-hide_banner", "-loglevel", "error", "-y"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    let video = config.video_device();
    let audio = config.audio_device();
    match format {
        InputFormat::V4l2 => {
            args.extend(["-f".into(), "v4l2".into(), "-i".into(), video]);
            if !options.muted {
                args.extend(["-f".into(), "pulse".into(), "-i".into(), audio]);
            }
        }
        InputFormat::AvFoundation => {
            let audio = if options.muted { "none".to_string() } else { audio };
            args.extend([
                "-f".into(),
                "avfoundation".into(),
                "-framerate".into(),
                "30".into(),
                "-i".into(),
                format!("{}:{}", video, audio),
            ]);
        }
        InputFormat::DShow => {
            let input = if options.muted {
                format!("video={}", video)
            } else {
                format!("video={}:audio={}", video, audio)
            };
            args.extend(["-f".into(), "dshow".into(), "-i".into(), input]);
        }
    }

    args.extend(["-t".into(), options.max_duration_secs.to_string()]);

    let max_height = options.quality.max_height();
    if max_height != u32::MAX {
        args.extend(["-vf".into(), format!("scale=-2:min(ih\\,{})", max_height)]);
    }

    args.extend(
        ["-c:v", "libx264", "-preset", "veryfast", "-pix_fmt", "yuv420p"]
            .iter()
            .map(|s| s.to_string()),
    );
    if options.muted {
        args.push("-an".into());
    } else {
        args.extend(["-c:a".to_string(), "aac".to_string()]);
    }
    args.extend(["-movflags".to_string(), "+faststart".to_string()]);
    args.push(output.display().to_string());
    args
}

fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n")
}

#[derive(Default)]
struct Session {
    // a capture was started and has not settled yet
    active: bool,
    // stop arrived before ffmpeg was running
    stop_pending: bool,
    // stdin of the running ffmpeg
    stdin: Option<ChildStdin>,
}

pub struct FfmpegCamera {
    config: CameraConfig,
    session: Mutex<Session>,
}

impl FfmpegCamera {
    pub fn new(config: CameraConfig) -> Self {
        Self {
            config,
            session: Mutex::new(Session::default()),
        }
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn capture(
        &self,
        options: &CaptureOptions,
    ) -> Result<MediaDescriptor, RecorderError> {
        let dir = self.config.output_dir();
        tokio::fs::create_dir_all(&dir).await?;
        let output = dir.join(format!("recording-{}.mp4", Uuid::new_v4()));
        let args = capture_args(&self.config, options, InputFormat::current(), &output);

        let child = {
            let mut session = self.session();
            if session.stop_pending {
                log::info!("Stop arrived before ffmpeg started, skipping capture");
                return Err(RecorderError::CaptureFailed(
                    "stopped before recording began".into(),
                ));
            }

            log::info!(
                "Starting capture ({}, max {}s, muted: {}) -> {}",
                options.quality.label(),
                options.max_duration_secs,
                options.muted,
                output.display()
            );
            log::debug!("{} {}", self.config.ffmpeg_path, args.join(" "));

            let mut child = Command::new(&self.config.ffmpeg_path)
                .args(&args)
                .stdin(Stdio::piped())
                .stdout(Stdio::null())
                .stderr(Stdio::piped())
                .kill_on_drop(true)
                .spawn()
                .map_err(|e| {
                    RecorderError::CaptureFailed(format!(
                        "could not launch {}: {}",
                        self.config.ffmpeg_path, e
                    ))
                })?;
            session.stdin = child.stdin.take();
            child
        };

        // stdin was moved out above, so waiting does not close it underneath stop_capture
        let finished = child
            .wait_with_output()
            .await
            .map_err(|e| RecorderError::CaptureFailed(format!("ffmpeg did not exit: {}", e)))?;
        if !finished.status.success() {
            let _ = tokio::fs::remove_file(&output).await;
            return Err(RecorderError::CaptureFailed(format!(
                "ffmpeg exited with {}: {}",
                finished.status,
                stderr_tail(&finished.stderr)
            )));
        }

        let written = tokio::fs::metadata(&output)
            .await
            .map(|m| m.len())
            .unwrap_or(0);
        if written == 0 {
            return Err(RecorderError::CaptureFailed("no video was written".into()));
        }

        log::info!("Capture finished: {} ({} bytes)", output.display(), written);
        Ok(MediaDescriptor::from_path(&output))
    }
}

#[async_trait]
impl CaptureDevice for FfmpegCamera {
    async fn start_capture(
        &self,
        options: &CaptureOptions,
    ) -> Result<MediaDescriptor, RecorderError> {
        options.validate()?;

        // armed before the first await so an immediate stop is never lost
        {
            let mut session = self.session();
            if session.active {
                return Err(RecorderError::RecordingInProgress);
            }
            session.active = true;
        }

        let result = self.capture(options).await;
        *self.session() = Session::default();
        result
    }

    async fn stop_capture(&self) -> Result<(), RecorderError> {
        let mut stdin = {
            let mut session = self.session();
            if !session.active {
                log::debug!("Stop requested with no capture in flight");
                return Ok(());
            }
            match session.stdin.take() {
                Some(stdin) => stdin,
                None => {
                    log::debug!("Stop requested before ffmpeg started, holding it");
                    session.stop_pending = true;
                    return Ok(());
                }
            }
        };

        // ffmpeg may already be exiting on its own; a closed pipe is fine
        if let Err(e) = stdin.write_all(b"q").await {
            log::debug!("ffmpeg stdin closed before stop: {}", e);
            return Ok(());
        }
        if let Err(e) = stdin.flush().await {
            log::debug!("ffmpeg stdin flush failed: {}", e);
        }
        Ok(())
    }
}

/// Stand-in ffmpeg for tests: records until stdin closes, then writes a
/// few bytes to the output path (its last argument).
#[cfg(all(test, unix))]
pub(crate) fn fake_ffmpeg(dir: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let script = dir.join("fake-ffmpeg");
    std::fs::write(
        &script,
        "#!/bin/sh\nfor out; do :; done\ncat > /dev/null\nprintf video > \"$out\"\n",
    )
    .unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
    script
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::config::QualityPreset;
    use std::time::Duration;

    fn config() -> CameraConfig {
        CameraConfig {
            video_input: Some("/dev/video2".into()),
            audio_input: Some("mic".into()),
            ..Default::default()
        }
    }

    fn pair(args: &[String], flag: &str) -> Option<String> {
        args.iter()
            .position(|a| a == flag)
            .and_then(|i| args.get(i + 1).cloned())
    }

    #[test]
    fn v4l2_args_include_audio_and_duration_ceiling() {
        let args = capture_args(
            &config(),
            &CaptureOptions::default(),
            InputFormat::V4l2,
            Path::new("/tmp/out.mp4"),
        );
        assert_eq!(pair(&args, "-t").as_deref(), Some("60"));
        assert!(args.contains(&"/dev/video2".to_string()));
        assert!(args.contains(&"pulse".to_string()));
        assert!(args.contains(&"mic".to_string()));
        assert_eq!(pair(&args, "-c:a").as_deref(), Some("aac"));
        assert_eq!(pair(&args, "-vf").as_deref(), Some("scale=-2:min(ih\\,1080)"));
        assert_eq!(args.last().map(String::as_str), Some("/tmp/out.mp4"));
    }

    #[test]
    fn muted_capture_drops_audio_input() {
        let options = CaptureOptions {
            muted: true,
            quality: QualityPreset::High,
            ..Default::default()
        };
        let args = capture_args(&config(), &options, InputFormat::V4l2, Path::new("o.mp4"));
        assert!(!args.contains(&"pulse".to_string()));
        assert!(args.contains(&"-an".to_string()));
        assert_eq!(pair(&args, "-vf"), None);
    }

    #[test]
    fn avfoundation_joins_video_and_audio_indices() {
        let cfg = CameraConfig {
            video_input: Some("0".into()),
            audio_input: Some("1".into()),
            ..Default::default()
        };
        let args = capture_args(
            &cfg,
            &CaptureOptions::default(),
            InputFormat::AvFoundation,
            Path::new("o.mp4"),
        );
        assert_eq!(pair(&args, "-i").as_deref(), Some("0:1"));

        let muted = CaptureOptions {
            muted: true,
            ..Default::default()
        };
        let args = capture_args(&cfg, &muted, InputFormat::AvFoundation, Path::new("o.mp4"));
        assert_eq!(pair(&args, "-i").as_deref(), Some("0:none"));
    }

    #[test]
    fn dshow_names_devices() {
        let args = capture_args(
            &config(),
            &CaptureOptions::default(),
            InputFormat::DShow,
            Path::new("o.mp4"),
        );
        assert_eq!(
            pair(&args, "-i").as_deref(),
            Some("video=/dev/video2:audio=mic")
        );
    }

    #[test]
    fn stderr_tail_keeps_last_lines() {
        let stderr = b"a\n\nb\nc\nd\ne\nf\n";
        assert_eq!(stderr_tail(stderr), "b\nc\nd\ne\nf");
    }

    #[tokio::test]
    async fn missing_binary_is_a_capture_failure() {
        let dir = tempfile::tempdir().unwrap();
        let camera = FfmpegCamera::new(CameraConfig {
            ffmpeg_path: dir.path().join("no-such-ffmpeg").display().to_string(),
            output_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        });
        let err = camera
            .start_capture(&CaptureOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RecorderError::CaptureFailed(_)));

        // the device is free again
        assert!(!camera.session().active);
    }

    #[tokio::test]
    async fn stop_without_capture_is_a_no_op() {
        let camera = FfmpegCamera::new(CameraConfig::default());
        assert!(camera.stop_capture().await.is_ok());
    }

    #[cfg(unix)]
    fn fake_camera(dir: &Path) -> FfmpegCamera {
        FfmpegCamera::new(CameraConfig {
            ffmpeg_path: fake_ffmpeg(dir).display().to_string(),
            output_dir: Some(dir.join("out")),
            ..Default::default()
        })
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn stop_ends_a_running_ffmpeg() {
        let dir = tempfile::tempdir().unwrap();
        let camera = fake_camera(dir.path());

        let opts = CaptureOptions::default();
        let (media, _) = tokio::join!(
            tokio::time::timeout(
                Duration::from_secs(5),
                camera.start_capture(&opts)
            ),
            async {
                while camera.session().stdin.is_none() {
                    tokio::time::sleep(Duration::from_millis(10)).await;
                }
                camera.stop_capture().await.unwrap();
            }
        );
        let media = media.expect("capture should end after stop").unwrap();
        let path = media.local_path().unwrap();
        assert_eq!(std::fs::read(path).unwrap(), b"video");
        assert!(!camera.session().active);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn stop_before_ffmpeg_starts_is_remembered() {
        let dir = tempfile::tempdir().unwrap();
        let camera = fake_camera(dir.path());

        // armed but not yet spawned
        camera.session().active = true;
        camera.stop_capture().await.unwrap();
        assert!(camera.session().stop_pending);

        let err = camera
            .capture(&CaptureOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RecorderError::CaptureFailed(_)));
        assert!(camera.session().stdin.is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn immediate_stop_ends_the_capture() {
        let dir = tempfile::tempdir().unwrap();
        let camera = fake_camera(dir.path());

        // join polls the capture first; stop lands before or just after the spawn
        let opts = CaptureOptions::default();
        let (outcome, stopped) = tokio::join!(
            tokio::time::timeout(
                Duration::from_secs(5),
                camera.start_capture(&opts)
            ),
            camera.stop_capture()
        );
        assert!(stopped.is_ok());
        assert!(outcome.is_ok(), "early stop was lost");

        // a held stop does not leak into the next capture
        let session = camera.session();
        assert!(!session.active);
        assert!(!session.stop_pending);
    }
}
