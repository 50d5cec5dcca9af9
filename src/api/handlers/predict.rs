use axum::{extract::State, http::StatusCode, Json};
use tracing::error;

use crate::api::handlers::reject;
use crate::api::state::AppState;
use crate::api::types::*;

/// POST /predict
pub async fn predict(
    State(state): State<AppState>,
    Json(request): Json<PredictionRequest>,
) -> std::result::Result<Json<PredictionResponse>, (StatusCode, Json<ErrorBody>)> {
    let Some(predictor) = state.predictor.as_ref() else {
        return Err(reject(StatusCode::SERVICE_UNAVAILABLE, "Model not loaded"));
    };

    if let Err(violations) = request.features.validate() {
        state.metrics.inc_validation_failures();
        return Err(reject(StatusCode::BAD_REQUEST, violations.join("; ")));
    }

    let prediction = predictor.predict_single(&request.features).map_err(|e| {
        error!("Prediction failed: {e}");
        reject(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Prediction failed: {e}"),
        )
    })?;

    state.metrics.inc_predictions();

    Ok(Json(PredictionResponse {
        worker_id: request.features.worker_id.clone(),
        predicted_stress_level: prediction.stress_level,
        prediction_probabilities: prediction.probabilities,
    }))
}

/// POST /predict_batch
pub async fn predict_batch(
    State(state): State<AppState>,
    Json(request): Json<BatchPredictionRequest>,
) -> std::result::Result<Json<BatchPredictionResponse>, (StatusCode, Json<ErrorBody>)> {
    let Some(predictor) = state.predictor.as_ref() else {
        return Err(reject(StatusCode::SERVICE_UNAVAILABLE, "Model not loaded"));
    };

    if request.workers.is_empty() {
        state.metrics.inc_validation_failures();
        return Err(reject(
            StatusCode::BAD_REQUEST,
            "workers must contain at least 1 record",
        ));
    }
    if request.workers.len() > state.max_batch_size {
        state.metrics.inc_validation_failures();
        return Err(reject(
            StatusCode::BAD_REQUEST,
            format!(
                "workers exceeds the batch limit of {} records, got {}",
                state.max_batch_size,
                request.workers.len()
            ),
        ));
    }

    for (index, worker) in request.workers.iter().enumerate() {
        if let Err(violations) = worker.validate() {
            state.metrics.inc_validation_failures();
            return Err(reject(
                StatusCode::BAD_REQUEST,
                format!("workers[{index}]: {}", violations.join("; ")),
            ));
        }
    }

    let predictions = predictor.predict_batch(&request.workers).map_err(|e| {
        error!("Batch prediction failed: {e}");
        reject(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Batch prediction failed: {e}"),
        )
    })?;

    state.metrics.inc_batch(request.workers.len() as u64);

    let predictions = request
        .workers
        .iter()
        .zip(predictions)
        .map(|(worker, prediction)| PredictionResponse {
            worker_id: worker.worker_id.clone(),
            predicted_stress_level: prediction.stress_level,
            prediction_probabilities: prediction.probabilities,
        })
        .collect::<Vec<_>>();

    let total_processed = predictions.len();
    Ok(Json(BatchPredictionResponse {
        predictions,
        total_processed,
    }))
}
