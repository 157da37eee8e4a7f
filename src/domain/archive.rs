//! ZIP unpacking into inline base64 entries.
//!
//! Stateless; shares nothing with the frame pipeline.

use base64::Engine;
use serde::Serialize;
use std::fmt;
use std::io::{Cursor, Read};
use std::path::Path;
use zip::ZipArchive;

pub const IMAGE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "webp", "bmp", "gif", "tiff", "tif",
];

const FALLBACK_MIME: &str = "application/octet-stream";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArchiveEntry {
    pub filename: String,
    pub mime_type: String,
    pub base64: String,
}

#[derive(Debug)]
pub enum ArchiveError {
    Malformed(String),
}

impl fmt::Display for ArchiveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArchiveError::Malformed(e) => write!(f, "Invalid ZIP file: {}", e),
        }
    }
}

impl std::error::Error for ArchiveError {}

impl From<zip::result::ZipError> for ArchiveError {
    fn from(err: zip::result::ZipError) -> Self {
        ArchiveError::Malformed(err.to_string())
    }
}

impl From<std::io::Error> for ArchiveError {
    fn from(err: std::io::Error) -> Self {
        ArchiveError::Malformed(err.to_string())
    }
}

/// Returns every file entry of the archive in archive order, skipping
/// directories. With `images_only`, entries whose extension is not in
/// [`IMAGE_EXTENSIONS`] are skipped as well. Any error discards the
/// partial result.
pub fn extract_entries(
    bytes: &[u8],
    images_only: bool,
) -> Result<Vec<ArchiveEntry>, ArchiveError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut entries = Vec::new();

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        let name = file.name().to_string();
        if file.is_dir() || name.ends_with('/') {
            continue;
        }
        if images_only && !is_image(&name) {
            continue;
        }

        // declared sizes come from the uploader; grow with the bytes actually read
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;

        let mime_type = mime_guess::from_path(&name)
            .first_raw()
            .unwrap_or(FALLBACK_MIME)
            .to_string();

        entries.push(ArchiveEntry {
            filename: name,
            mime_type,
            base64: base64::engine::general_purpose::STANDARD.encode(&data),
        });
    }

    Ok(entries)
}

fn is_image(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}
