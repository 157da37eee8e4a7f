//! Ports - Trait definitions the pipeline depends on.

pub mod cache;
pub mod fetcher;
pub mod media;
