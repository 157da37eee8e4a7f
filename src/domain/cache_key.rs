use sha2::{Digest, Sha256};
use std::fmt;
use url::Url;

/// Bytes of the SHA-256 digest kept in a key (32 hex chars).
const KEY_BYTES: usize = 16;

/// Deterministic fingerprint of a source URL.
///
/// Used both as the cached video's file stem and as the job id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn from_source(source: &str) -> Self {
        let canonical = canonicalize(source);
        let digest = Sha256::digest(canonical.as_bytes());
        CacheKey(hex::encode(&digest[..KEY_BYTES]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Trims the identifier and, when it parses as a URL, uses the parser's
/// serialisation so that scheme/host casing does not split the cache.
pub fn canonicalize(source: &str) -> String {
    let trimmed = source.trim();
    match Url::parse(trimmed) {
        Ok(url) => url.to_string(),
        Err(_) => trimmed.to_string(),
    }
}
