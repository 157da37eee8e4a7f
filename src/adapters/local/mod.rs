//! Local adapters for single-server deployment.

pub mod fetch;
pub mod ffmpeg;
pub mod fs;
pub mod http;

pub use fetch::HttpFetcher;
pub use ffmpeg::FfmpegTool;
pub use fs::FsCacheStore;
