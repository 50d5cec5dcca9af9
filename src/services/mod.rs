//! Supporting services: model artifact fetching and observability counters.

mod fetch;
mod metrics;

pub use fetch::{ensure_model_available, normalize_dropbox_url};
pub use metrics::Metrics;
