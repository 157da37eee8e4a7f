//! HTTP inbound adapter.
//!
//! Routes:
//! - `POST /frames` sample frames and a word budget for a video URL
//! - `POST /unzip` unpack an uploaded ZIP into base64 entries
//! - `GET /files/...`, `GET /cache/...` read-only cached artifacts
//! - `GET /health`

pub mod error;
pub mod handlers;

use crate::application::pipeline::FramePipeline;
use crate::ports::{cache::CacheStore, fetcher::SourceFetcher, media::MediaTool};
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub fn router<C, F, M>(
    pipeline: Arc<FramePipeline<C, F, M>>,
    files_root: &Path,
    cache_root: &Path,
) -> Router
where
    C: CacheStore + 'static,
    F: SourceFetcher + 'static,
    M: MediaTool + 'static,
{
    Router::new()
        .route("/health", get(handlers::health::handle))
        .route("/frames", post(handlers::frames::handle::<C, F, M>))
        .route("/unzip", post(handlers::unzip::handle))
        .with_state(pipeline)
        .nest_service("/files", ServeDir::new(files_root))
        .nest_service("/cache", ServeDir::new(cache_root))
        .layer(DefaultBodyLimit::disable())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
