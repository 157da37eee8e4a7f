use super::sampler::{sample_phase, CompletionPolicy};
use super::single_flight::KeyLocks;
use crate::domain::budget::compute_word_budget;
use crate::domain::frames::{FramePayload, PhaseFrames};
use crate::domain::phases::{self, Phase, MAX_FRAMES, PHASES};
use crate::error::PipelineError;
use crate::ports::cache::CacheStore;
use crate::ports::fetcher::SourceFetcher;
use crate::ports::media::MediaTool;
use futures::{stream, StreamExt, TryStreamExt};
use tracing::info;

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub phases: Vec<Phase>,
    pub max_frames: usize,
    /// Phases extracted at the same time for one request.
    pub extract_concurrency: usize,
    pub completion: CompletionPolicy,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            phases: PHASES.to_vec(),
            max_frames: MAX_FRAMES,
            extract_concurrency: PHASES.len(),
            completion: CompletionPolicy::default(),
        }
    }
}

/// Turns a source URL into sampled frames and a word budget, reusing
/// whatever is already cached.
pub struct FramePipeline<C, F, M> {
    store: C,
    fetcher: F,
    media: M,
    locks: KeyLocks,
    options: PipelineOptions,
}

impl<C, F, M> FramePipeline<C, F, M>
where
    C: CacheStore,
    F: SourceFetcher,
    M: MediaTool,
{
    pub fn new(store: C, fetcher: F, media: M, options: PipelineOptions) -> Self {
        Self {
            store,
            fetcher,
            media,
            locks: KeyLocks::new(),
            options,
        }
    }

    pub fn store(&self) -> &C {
        &self.store
    }

    pub async fn process(&self, source_url: &str) -> Result<FramePayload, PipelineError> {
        let key = self.store.resolve(source_url).await.key;
        let _guard = self.locks.lock(key.as_str()).await;

        // re-check under the lock; a concurrent request may have fetched it
        let source = self.store.resolve(source_url).await;
        if source.present {
            info!(job = %source.key, "source video cache hit");
        } else {
            info!(job = %source.key, url = source_url.trim(), "fetching source video");
            self.fetcher.fetch(source_url.trim(), &source.path).await?;
        }

        let duration = self.media.probe_duration(&source.path).await?;
        let word_budget = compute_word_budget(duration);
        info!(job = %source.key, duration, word_budget, "probed source video");

        let windows = phases::plan(&self.options.phases, duration, self.options.max_frames);
        let tasks: Vec<_> = windows
            .iter()
            .map(|window| {
                sample_phase(
                    &self.store,
                    &self.media,
                    &source.path,
                    &source.key,
                    window,
                    self.options.completion,
                )
            })
            .collect();
        // buffered keeps declaration order while bounding parallelism
        let phase_frames: Vec<PhaseFrames> = stream::iter(tasks)
            .buffered(self.options.extract_concurrency.max(1))
            .try_collect()
            .await?;

        let payload = FramePayload::assemble(
            source.key.to_string(),
            duration,
            word_budget,
            phase_frames,
            source.present,
            self.options.max_frames,
        );
        info!(
            job = %payload.job_id,
            frames = payload.total_frames,
            cached = payload.cached,
            "frames ready"
        );
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::local::fs::FsCacheStore;
    use crate::error::{ExtractionError, FetchError, ProbeError};
    use crate::ports::media::MockMediaTool;
    use async_trait::async_trait;
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::{tempdir, TempDir};

    const URL: &str = "https://example.com/clip.mp4";

    #[derive(Default)]
    struct FakeFetcher {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl SourceFetcher for FakeFetcher {
        async fn fetch(&self, _url: &str, destination: &Path) -> Result<(), FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(FetchError::Status(500));
            }
            tokio::fs::create_dir_all(destination.parent().unwrap()).await?;
            tokio::fs::write(destination, b"video").await?;
            Ok(())
        }
    }

    /// Reports a fixed duration and writes `frame_count` files per call.
    struct FakeMedia {
        duration: f64,
        probes: AtomicUsize,
        extractions: AtomicUsize,
    }

    impl FakeMedia {
        fn new(duration: f64) -> Self {
            Self {
                duration,
                probes: AtomicUsize::new(0),
                extractions: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl MediaTool for FakeMedia {
        async fn probe_duration(&self, _video_path: &Path) -> Result<f64, ProbeError> {
            self.probes.fetch_add(1, Ordering::SeqCst);
            Ok(self.duration)
        }

        async fn extract_frames(
            &self,
            _video_path: &Path,
            _start_time: f64,
            _interval: f64,
            frame_count: usize,
            output_dir: &Path,
        ) -> Result<(), ExtractionError> {
            self.extractions.fetch_add(1, Ordering::SeqCst);
            for i in 1..=frame_count {
                tokio::fs::write(output_dir.join(format!("scene_{:03}.jpg", i)), b"jpg")
                    .await
                    .map_err(ExtractionError::Spawn)?;
            }
            Ok(())
        }
    }

    fn store(dir: &TempDir) -> FsCacheStore {
        FsCacheStore::new(dir.path().join("cache"), dir.path().join("files"), "")
    }

    #[tokio::test]
    async fn test_first_request_fetches_and_extracts_everything() {
        let dir = tempdir().unwrap();
        let fetcher = Arc::new(FakeFetcher::default());
        let media = Arc::new(FakeMedia::new(100.0));
        let pipeline = FramePipeline::new(
            store(&dir),
            fetcher.clone(),
            media.clone(),
            PipelineOptions::default(),
        );

        let payload = pipeline.process(URL).await.unwrap();

        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
        assert_eq!(media.extractions.load(Ordering::SeqCst), 4);
        assert!(!payload.cached);
        assert_eq!(payload.duration, 100.0);
        assert_eq!(payload.word_budget, 187);
        assert_eq!(payload.words_per_second, 2.2);
        // 4 phases x 5 frames, capped at 18
        assert_eq!(payload.total_frames, 18);
        let phases: Vec<&str> = payload.frames.iter().map(|f| f.phase.as_str()).collect();
        assert_eq!(&phases[..5], &["early"; 5]);
        assert_eq!(&phases[15..], &["final"; 3]);
        let mid: Vec<f64> = payload
            .frames
            .iter()
            .filter(|f| f.phase == "mid")
            .map(|f| f.timestamp)
            .collect();
        assert_eq!(mid, vec![35.0, 40.0, 45.0, 50.0, 55.0]);
    }

    #[tokio::test]
    async fn test_repeat_request_is_fully_cached() {
        let dir = tempdir().unwrap();
        let fetcher = Arc::new(FakeFetcher::default());
        let media = Arc::new(FakeMedia::new(60.0));
        let pipeline = FramePipeline::new(
            store(&dir),
            fetcher.clone(),
            media.clone(),
            PipelineOptions::default(),
        );

        let first = pipeline.process(URL).await.unwrap();
        let second = pipeline.process(URL).await.unwrap();

        assert!(!first.cached);
        assert!(second.cached);
        assert_eq!(first.frames, second.frames);
        assert_eq!(first.job_id, second.job_id);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
        assert_eq!(media.extractions.load(Ordering::SeqCst), 4);
        // duration is not persisted, so each request probes again
        assert_eq!(media.probes.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_cached_video_with_missing_phase_is_not_cached() {
        let dir = tempdir().unwrap();
        let fetcher = Arc::new(FakeFetcher::default());
        let media = Arc::new(FakeMedia::new(60.0));
        let pipeline = FramePipeline::new(
            store(&dir),
            fetcher.clone(),
            media.clone(),
            PipelineOptions::default(),
        );

        let first = pipeline.process(URL).await.unwrap();
        let late_dir: PathBuf = dir.path().join("files").join(&first.job_id).join("late");
        std::fs::remove_dir_all(late_dir).unwrap();

        let second = pipeline.process(URL).await.unwrap();

        assert!(!second.cached);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
        assert_eq!(media.extractions.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_fetch_failure_aborts_before_probe() {
        let dir = tempdir().unwrap();
        let fetcher = FakeFetcher {
            fail: true,
            ..Default::default()
        };
        let mut media = MockMediaTool::new();
        media.expect_probe_duration().times(0);
        media.expect_extract_frames().times(0);
        let pipeline = FramePipeline::new(store(&dir), fetcher, media, PipelineOptions::default());

        let err = pipeline.process(URL).await.unwrap_err();

        assert!(matches!(err, PipelineError::Fetch(FetchError::Status(500))));
    }

    #[tokio::test]
    async fn test_probe_failure_aborts_before_extraction() {
        let dir = tempdir().unwrap();
        let mut media = MockMediaTool::new();
        media
            .expect_probe_duration()
            .times(1)
            .returning(|_| Err(ProbeError::Unparsable("N/A".into())));
        media.expect_extract_frames().times(0);
        let pipeline = FramePipeline::new(
            store(&dir),
            FakeFetcher::default(),
            media,
            PipelineOptions::default(),
        );

        let err = pipeline.process(URL).await.unwrap_err();

        assert!(matches!(err, PipelineError::Probe(_)));
    }

    #[tokio::test]
    async fn test_extraction_failure_returns_no_payload() {
        let dir = tempdir().unwrap();
        let mut media = MockMediaTool::new();
        media.expect_probe_duration().returning(|_| Ok(30.0));
        media.expect_extract_frames().returning(|_, _, _, _, _| {
            Err(ExtractionError::Failed {
                code: Some(1),
                stderr: "bad input".into(),
            })
        });
        let pipeline = FramePipeline::new(
            store(&dir),
            FakeFetcher::default(),
            media,
            PipelineOptions::default(),
        );

        let err = pipeline.process(URL).await.unwrap_err();

        assert!(matches!(err, PipelineError::Extraction { .. }));
    }

    #[tokio::test]
    async fn test_short_video_uses_minimum_budget() {
        let dir = tempdir().unwrap();
        let pipeline = FramePipeline::new(
            store(&dir),
            FakeFetcher::default(),
            FakeMedia::new(2.0),
            PipelineOptions::default(),
        );

        let payload = pipeline.process(URL).await.unwrap();

        assert_eq!(payload.word_budget, 5);
    }

    #[tokio::test]
    async fn test_concurrent_first_requests_share_one_fetch() {
        let dir = tempdir().unwrap();
        let fetcher = Arc::new(FakeFetcher::default());
        let media = Arc::new(FakeMedia::new(60.0));
        let pipeline = Arc::new(FramePipeline::new(
            store(&dir),
            fetcher.clone(),
            media.clone(),
            PipelineOptions::default(),
        ));

        let a = tokio::spawn({
            let pipeline = pipeline.clone();
            async move { pipeline.process(URL).await }
        });
        let b = tokio::spawn({
            let pipeline = pipeline.clone();
            async move { pipeline.process(URL).await }
        });
        let a = a.await.unwrap().unwrap();
        let b = b.await.unwrap().unwrap();

        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
        assert_eq!(media.extractions.load(Ordering::SeqCst), 4);
        assert_eq!(a.frames, b.frames);
        assert!(a.cached != b.cached);
    }

    #[tokio::test]
    async fn test_frames_are_capped_by_options() {
        let dir = tempdir().unwrap();
        let options = PipelineOptions {
            max_frames: 6,
            extract_concurrency: 1,
            ..Default::default()
        };
        let pipeline = FramePipeline::new(
            store(&dir),
            FakeFetcher::default(),
            FakeMedia::new(100.0),
            options,
        );

        let payload = pipeline.process(URL).await.unwrap();

        // ceil(6 / 4) = 2 frames per phase, 8 produced, 6 kept
        assert_eq!(payload.total_frames, 6);
        assert_eq!(payload.frames.last().unwrap().phase, "late");
    }
}
