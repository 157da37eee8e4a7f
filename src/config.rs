//! Configuration loaded from the environment.

use crate::application::sampler::CompletionPolicy;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Configuration for the frame service.
#[derive(Clone, Debug)]
pub struct Config {
    /// HTTP server bind address
    pub addr: String,
    /// HTTP server port
    pub port: String,
    /// Root of `<job>/<phase>/scene_NNN.jpg` trees, served under `/files`
    pub files_root: PathBuf,
    /// Root of cached source videos, served under `/cache`
    pub cache_root: PathBuf,
    /// Prefix for frame URLs in responses; empty means host-relative
    pub public_base_url: String,
    /// Upper bound on a single source download
    pub fetch_timeout: Duration,
    /// Phases extracted in parallel per request
    pub extract_concurrency: usize,
    pub phase_completion: CompletionPolicy,
    pub ffmpeg_bin: String,
    pub ffprobe_bin: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a config from any variable source. Unset or invalid values
    /// fall back to defaults.
    pub fn from_lookup<L>(lookup: L) -> Self
    where
        L: Fn(&str) -> Option<String>,
    {
        let string =
            |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        Self {
            addr: string("ADDR", "127.0.0.1"),
            port: string("PORT", "3000"),
            files_root: PathBuf::from(string("FILES_ROOT", "./files")),
            cache_root: PathBuf::from(string("CACHE_ROOT", "./cache")),
            public_base_url: string("PUBLIC_BASE_URL", ""),
            fetch_timeout: Duration::from_secs(parsed(&lookup, "FETCH_TIMEOUT_SECS", 120u64)),
            extract_concurrency: parsed(&lookup, "EXTRACT_CONCURRENCY", 4usize).max(1),
            phase_completion: parsed(&lookup, "PHASE_COMPLETION", CompletionPolicy::Marker),
            ffmpeg_bin: string("FFMPEG_BIN", "ffmpeg"),
            ffprobe_bin: string("FFPROBE_BIN", "ffprobe"),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.addr, self.port)
    }
}

fn parsed<L, T>(lookup: &L, name: &str, default: T) -> T
where
    L: Fn(&str) -> Option<String>,
    T: FromStr,
{
    lookup(name)
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.bind_addr(), "127.0.0.1:3000");
        assert_eq!(config.files_root, PathBuf::from("./files"));
        assert_eq!(config.cache_root, PathBuf::from("./cache"));
        assert_eq!(config.public_base_url, "");
        assert_eq!(config.fetch_timeout, Duration::from_secs(120));
        assert_eq!(config.extract_concurrency, 4);
        assert_eq!(config.phase_completion, CompletionPolicy::Marker);
        assert_eq!(config.ffmpeg_bin, "ffmpeg");
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("PORT", "8080"),
            ("FETCH_TIMEOUT_SECS", "30"),
            ("EXTRACT_CONCURRENCY", "2"),
            ("PHASE_COMPLETION", "non-empty"),
            ("PUBLIC_BASE_URL", "https://cdn.example.com"),
        ]);
        assert_eq!(config.port, "8080");
        assert_eq!(config.fetch_timeout, Duration::from_secs(30));
        assert_eq!(config.extract_concurrency, 2);
        assert_eq!(config.phase_completion, CompletionPolicy::NonEmpty);
        assert_eq!(config.public_base_url, "https://cdn.example.com");
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config_from(&[
            ("FETCH_TIMEOUT_SECS", "soon"),
            ("EXTRACT_CONCURRENCY", "0"),
            ("PHASE_COMPLETION", "whenever"),
        ]);
        assert_eq!(config.fetch_timeout, Duration::from_secs(120));
        assert_eq!(config.extract_concurrency, 1);
        assert_eq!(config.phase_completion, CompletionPolicy::Marker);
    }
}
