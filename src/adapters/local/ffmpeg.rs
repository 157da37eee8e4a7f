use crate::error::{ExtractionError, ProbeError};
use crate::ports::media::MediaTool;
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::Path;
use tokio::process::Command;

/// Output pattern for sampled frames. Zero padding keeps lexicographic
/// order equal to temporal order.
pub const FRAME_PATTERN: &str = "scene_%03d.jpg";

/// Shells out to `ffprobe` / `ffmpeg`.
#[derive(Clone, Debug)]
pub struct FfmpegTool {
    ffmpeg_bin: String,
    ffprobe_bin: String,
}

impl FfmpegTool {
    pub fn new(ffmpeg_bin: impl Into<String>, ffprobe_bin: impl Into<String>) -> Self {
        Self {
            ffmpeg_bin: ffmpeg_bin.into(),
            ffprobe_bin: ffprobe_bin.into(),
        }
    }
}

impl Default for FfmpegTool {
    fn default() -> Self {
        Self::new("ffmpeg", "ffprobe")
    }
}

fn probe_args(video_path: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = [
        "-v",
        "error",
        "-show_entries",
        "format=duration",
        "-of",
        "default=noprint_wrappers=1:nokey=1",
    ]
    .iter()
    .map(OsString::from)
    .collect();
    args.push(video_path.as_os_str().to_owned());
    args
}

fn extract_args(
    video_path: &Path,
    start_time: f64,
    interval: f64,
    frame_count: usize,
    output_dir: &Path,
) -> Vec<OsString> {
    vec![
        "-hide_banner".into(),
        "-loglevel".into(),
        "error".into(),
        "-y".into(),
        "-ss".into(),
        format!("{:.3}", start_time).into(),
        "-i".into(),
        video_path.as_os_str().to_owned(),
        "-vf".into(),
        format!("fps={:.6}", 1.0 / interval).into(),
        "-frames:v".into(),
        frame_count.to_string().into(),
        "-q:v".into(),
        "2".into(),
        output_dir.join(FRAME_PATTERN).into_os_string(),
    ]
}

/// Reads the first line of probe output as a finite, non-negative number.
pub fn parse_duration(stdout: &str) -> Result<f64, ProbeError> {
    let line = stdout.lines().next().unwrap_or("").trim();
    match line.parse::<f64>() {
        Ok(duration) if duration.is_finite() && duration >= 0.0 => Ok(duration),
        _ => Err(ProbeError::Unparsable(line.to_string())),
    }
}

#[async_trait]
impl MediaTool for FfmpegTool {
    async fn probe_duration(&self, video_path: &Path) -> Result<f64, ProbeError> {
        let output = Command::new(&self.ffprobe_bin)
            .args(probe_args(video_path))
            .kill_on_drop(true)
            .output()
            .await
            .map_err(ProbeError::Spawn)?;

        if !output.status.success() {
            return Err(ProbeError::Failed {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        parse_duration(&String::from_utf8_lossy(&output.stdout))
    }

    async fn extract_frames(
        &self,
        video_path: &Path,
        start_time: f64,
        interval: f64,
        frame_count: usize,
        output_dir: &Path,
    ) -> Result<(), ExtractionError> {
        let output = Command::new(&self.ffmpeg_bin)
            .args(extract_args(
                video_path,
                start_time,
                interval,
                frame_count,
                output_dir,
            ))
            .kill_on_drop(true)
            .output()
            .await
            .map_err(ExtractionError::Spawn)?;

        if !output.status.success() {
            return Err(ExtractionError::Failed {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(())
    }
}
