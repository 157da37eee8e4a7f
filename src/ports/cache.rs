use crate::domain::cache_key::CacheKey;
use async_trait::async_trait;
use std::path::PathBuf;

/// Where a source video lives locally and whether it is already there.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedSource {
    pub key: CacheKey,
    pub path: PathBuf,
    pub present: bool,
}

#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Pure path computation plus an existence check. A missing file is a
    /// normal state, not an error.
    async fn resolve(&self, source: &str) -> CachedSource;

    /// Directory holding one phase's frames for a job.
    fn phase_dir(&self, key: &CacheKey, phase: &str) -> PathBuf;

    /// Public URL a client can fetch the frame from.
    fn frame_url(&self, key: &CacheKey, phase: &str, file_name: &str) -> String;
}
