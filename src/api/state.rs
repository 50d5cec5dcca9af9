use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::predictor::StressPredictor;
use crate::services::Metrics;

/// Shared application state for API handlers
#[derive(Clone)]
pub struct AppState {
    /// Loaded predictor; `None` keeps the routes serving 503s so probes can
    /// observe an unloaded model.
    pub predictor: Option<Arc<StressPredictor>>,

    /// Observability counters
    pub metrics: Arc<Metrics>,

    /// Application start time
    pub start_time: DateTime<Utc>,

    /// Maximum workers accepted per batch request
    pub max_batch_size: usize,
}

impl AppState {
    pub fn new(predictor: Arc<StressPredictor>, max_batch_size: usize) -> Self {
        Self {
            predictor: Some(predictor),
            metrics: Arc::new(Metrics::new()),
            start_time: Utc::now(),
            max_batch_size,
        }
    }

    /// State without a loaded model; every prediction route answers 503.
    pub fn unloaded(max_batch_size: usize) -> Self {
        Self {
            predictor: None,
            metrics: Arc::new(Metrics::new()),
            start_time: Utc::now(),
            max_batch_size,
        }
    }

    pub fn model_loaded(&self) -> bool {
        self.predictor.is_some()
    }

    /// Get system uptime in seconds
    pub fn uptime_seconds(&self) -> i64 {
        (Utc::now() - self.start_time).num_seconds()
    }
}
