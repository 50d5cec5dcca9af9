//! Core domain types: worker feature payloads and stress labels.

mod features;
mod stress;

pub use features::WorkerFeatures;
pub use stress::StressLevel;
