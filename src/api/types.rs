use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{StressLevel, WorkerFeatures};

// ============================================================================
// Prediction Types
// ============================================================================

/// Single prediction request
#[derive(Debug, Clone, Deserialize)]
pub struct PredictionRequest {
    pub features: WorkerFeatures,
}

/// Batch prediction request
#[derive(Debug, Clone, Deserialize)]
pub struct BatchPredictionRequest {
    pub workers: Vec<WorkerFeatures>,
}

/// Single prediction response
#[derive(Debug, Clone, Serialize)]
pub struct PredictionResponse {
    pub worker_id: Option<String>,
    pub predicted_stress_level: StressLevel,
    pub prediction_probabilities: BTreeMap<String, f64>,
}

/// Batch prediction response
#[derive(Debug, Clone, Serialize)]
pub struct BatchPredictionResponse {
    pub predictions: Vec<PredictionResponse>,
    pub total_processed: usize,
}

// ============================================================================
// Health & Info Types
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
    pub version: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelInfoResponse {
    pub model_type: String,
    pub model_version: String,
    pub features_count: usize,
    pub target_classes: Vec<String>,
    pub description: String,
}

// ============================================================================
// Error Body
// ============================================================================

/// JSON error envelope returned by every failing endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

impl ErrorBody {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}
