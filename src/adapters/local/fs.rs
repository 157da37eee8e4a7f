use crate::domain::cache_key::CacheKey;
use crate::ports::cache::{CacheStore, CachedSource};
use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};

/// Extension given to every cached source video.
const VIDEO_EXTENSION: &str = "mp4";

/// Filesystem-backed cache.
///
/// Layout:
/// - `<cache_root>/<key>.mp4` for source videos
/// - `<files_root>/<key>/<phase>/scene_NNN.jpg` for frames
#[derive(Clone, Debug)]
pub struct FsCacheStore {
    cache_root: PathBuf,
    files_root: PathBuf,
    public_base_url: String,
}

impl FsCacheStore {
    pub fn new(
        cache_root: impl Into<PathBuf>,
        files_root: impl Into<PathBuf>,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            cache_root: cache_root.into(),
            files_root: files_root.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Creates both roots. Safe to call on every start.
    pub async fn ensure_roots(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.cache_root).await?;
        tokio::fs::create_dir_all(&self.files_root).await?;
        Ok(())
    }

    pub fn cache_root(&self) -> &Path {
        &self.cache_root
    }

    pub fn files_root(&self) -> &Path {
        &self.files_root
    }

    pub fn video_path(&self, key: &CacheKey) -> PathBuf {
        self.cache_root
            .join(format!("{}.{}", key.as_str(), VIDEO_EXTENSION))
    }
}

#[async_trait]
impl CacheStore for FsCacheStore {
    async fn resolve(&self, source: &str) -> CachedSource {
        let key = CacheKey::from_source(source);
        let path = self.video_path(&key);
        let present = tokio::fs::metadata(&path)
            .await
            .map(|meta| meta.is_file())
            .unwrap_or(false);

        CachedSource { key, path, present }
    }

    fn phase_dir(&self, key: &CacheKey, phase: &str) -> PathBuf {
        self.files_root.join(key.as_str()).join(phase)
    }

    fn frame_url(&self, key: &CacheKey, phase: &str, file_name: &str) -> String {
        format!(
            "{}/files/{}/{}/{}",
            self.public_base_url,
            key.as_str(),
            phase,
            file_name
        )
    }
}
