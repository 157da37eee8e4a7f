use super::super::error::AppError;
use crate::application::pipeline::FramePipeline;
use crate::domain::frames::FramePayload;
use crate::ports::{cache::CacheStore, fetcher::SourceFetcher, media::MediaTool};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;
use tracing::warn;
use url::Url;

#[derive(Debug, Deserialize)]
pub struct FramesRequest {
    pub url: String,
}

pub async fn handle<C, F, M>(
    State(pipeline): State<Arc<FramePipeline<C, F, M>>>,
    body: Result<Json<FramesRequest>, JsonRejection>,
) -> Result<Json<FramePayload>, AppError>
where
    C: CacheStore,
    F: SourceFetcher,
    M: MediaTool,
{
    let Json(request) = body.map_err(|e| AppError::bad_request(e.body_text()))?;
    let url = validate_source_url(&request.url)?;

    match pipeline.process(url).await {
        Ok(payload) => Ok(Json(payload)),
        Err(e) => {
            warn!(url, error = %e, "frame request failed");
            Err(e.into())
        }
    }
}

/// Only absolute http(s) URLs are fetched.
fn validate_source_url(raw: &str) -> Result<&str, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::bad_request("url must not be empty"));
    }
    let parsed = Url::parse(trimmed)
        .map_err(|e| AppError::bad_request(format!("invalid url: {}", e)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(trimmed),
        other => Err(AppError::bad_request(format!(
            "unsupported url scheme: {}",
            other
        ))),
    }
}
