use crate::error::{ExtractionError, ProbeError};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

/// Black-box video tooling: duration probing and frame sampling.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaTool: Send + Sync {
    /// Duration of the video in seconds.
    async fn probe_duration(&self, video_path: &Path) -> Result<f64, ProbeError>;

    /// Writes up to `frame_count` frames, one every `interval` seconds from
    /// `start_time`, into `output_dir` as `scene_NNN.jpg`.
    async fn extract_frames(
        &self,
        video_path: &Path,
        start_time: f64,
        interval: f64,
        frame_count: usize,
        output_dir: &Path,
    ) -> Result<(), ExtractionError>;
}

#[async_trait]
impl<T: MediaTool + ?Sized> MediaTool for Arc<T> {
    async fn probe_duration(&self, video_path: &Path) -> Result<f64, ProbeError> {
        (**self).probe_duration(video_path).await
    }

    async fn extract_frames(
        &self,
        video_path: &Path,
        start_time: f64,
        interval: f64,
        frame_count: usize,
        output_dir: &Path,
    ) -> Result<(), ExtractionError> {
        (**self)
            .extract_frames(video_path, start_time, interval, frame_count, output_dir)
            .await
    }
}
