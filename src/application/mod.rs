//! Application layer - Services that use ports.

pub mod pipeline;
pub mod sampler;
pub mod single_flight;
