//! Framecast - Frame sampling and narration budget service
//!
//! Hexagonal Architecture:
//! - domain/: Pure logic (cache keys, word budget, phases, frame payloads, archives)
//! - ports/: Trait definitions (cache store, source fetcher, media tool)
//! - adapters/: Concrete implementations (filesystem, HTTP fetch, ffmpeg, axum API)
//! - application/: The frame pipeline and phase sampler
//! - config: Environment configuration

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod ports;

// Re-exports for convenience
pub use adapters::local::{FfmpegTool, FsCacheStore, HttpFetcher};
pub use application::pipeline::{FramePipeline, PipelineOptions};
pub use config::Config;
pub use error::PipelineError;
