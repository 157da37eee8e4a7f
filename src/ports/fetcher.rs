use crate::error::FetchError;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

#[async_trait]
pub trait SourceFetcher: Send + Sync {
    /// Downloads `url` into `destination`. On success the file is complete;
    /// on failure nothing is left at `destination`.
    async fn fetch(&self, url: &str, destination: &Path) -> Result<(), FetchError>;
}

#[async_trait]
impl<T: SourceFetcher + ?Sized> SourceFetcher for Arc<T> {
    async fn fetch(&self, url: &str, destination: &Path) -> Result<(), FetchError> {
        (**self).fetch(url, destination).await
    }
}
