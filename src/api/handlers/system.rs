use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::api::handlers::reject;
use crate::api::state::AppState;
use crate::api::types::*;
use crate::predictor::ModelInfo;

const DESCRIPTION: &str = "Financial stress prediction model for gig economy workers";

/// GET / -- API and model information
pub async fn root(
    State(state): State<AppState>,
) -> std::result::Result<Json<ModelInfoResponse>, (StatusCode, Json<ErrorBody>)> {
    let Some(predictor) = state.predictor.as_ref() else {
        return Err(reject(StatusCode::SERVICE_UNAVAILABLE, "Model not loaded"));
    };
    let info = predictor.model_info();

    Ok(Json(ModelInfoResponse {
        model_type: info.model_type,
        model_version: env!("CARGO_PKG_VERSION").to_string(),
        features_count: info.n_features,
        target_classes: info.target_classes,
        description: DESCRIPTION.to_string(),
    }))
}

/// GET /health -- full health report, 503 while the model is not loaded
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let loaded = state.model_loaded();
    let response = HealthResponse {
        status: if loaded { "healthy" } else { "unhealthy" }.to_string(),
        model_loaded: loaded,
        version: env!("CARGO_PKG_VERSION").to_string(),
    };
    let status = if loaded {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(response))
}

/// GET /healthz -- liveness probe, process is up
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /readyz -- readiness probe, model loaded and serving
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    if state.model_loaded() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// GET /metrics -- Prometheus text format
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    let body = state
        .metrics
        .prometheus(state.model_loaded(), state.uptime_seconds());
    (
        StatusCode::OK,
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; charset=utf-8",
        )],
        body,
    )
}

/// GET /model/info -- detailed model information
pub async fn model_info(
    State(state): State<AppState>,
) -> std::result::Result<Json<ModelInfo>, (StatusCode, Json<ErrorBody>)> {
    let Some(predictor) = state.predictor.as_ref() else {
        return Err(reject(StatusCode::SERVICE_UNAVAILABLE, "Model not loaded"));
    };
    Ok(Json(predictor.model_info()))
}
