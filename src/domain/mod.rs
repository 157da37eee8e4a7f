//! Domain layer - Pure business logic.

pub mod archive;
pub mod budget;
pub mod cache_key;
pub mod frames;
pub mod phases;
