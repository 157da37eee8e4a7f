use super::super::error::AppError;
use crate::domain::archive::{extract_entries, ArchiveEntry};
use axum::extract::Multipart;
use axum::Json;
use serde::Serialize;
use tracing::{info, warn};

const INVALID_ZIP: &str = "Invalid ZIP file";

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum UnzipResponse {
    Files { files: Vec<ArchiveEntry> },
    Error { error: String },
}

/// Accepts a multipart upload with a `file` field and an optional
/// `images_only` flag.
pub async fn handle(mut multipart: Multipart) -> Result<Json<UnzipResponse>, AppError> {
    let mut archive = None;
    let mut images_only = false;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(e.body_text()))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("file") => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::bad_request(e.body_text()))?;
                archive = Some(bytes);
            }
            Some("images_only") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::bad_request(e.body_text()))?;
                images_only = parse_form_bool(&text).ok_or_else(|| {
                    AppError::bad_request(format!("invalid images_only value: {}", text))
                })?;
            }
            _ => continue,
        }
    }

    let archive = archive.ok_or_else(|| AppError::bad_request("missing file field"))?;
    let size = archive.len();

    let result = tokio::task::spawn_blocking(move || extract_entries(&archive, images_only))
        .await
        .map_err(|e| AppError::internal(e.to_string()))?;

    match result {
        Ok(files) => {
            info!(size, images_only, entries = files.len(), "unzipped archive");
            Ok(Json(UnzipResponse::Files { files }))
        }
        Err(e) => {
            warn!(size, error = %e, "rejected archive");
            Ok(Json(UnzipResponse::Error {
                error: INVALID_ZIP.to_string(),
            }))
        }
    }
}

fn parse_form_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
