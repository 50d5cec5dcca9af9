use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::api::{handlers, state::AppState};

pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Info endpoints
        .route("/", get(handlers::root))
        .route("/model/info", get(handlers::model_info))
        // Prediction endpoints
        .route("/predict", post(handlers::predict))
        .route("/predict_batch", post(handlers::predict_batch))
        // Health & observability endpoints
        .route("/health", get(handlers::health))
        .route("/healthz", get(handlers::liveness))
        .route("/readyz", get(handlers::readiness))
        .route("/metrics", get(handlers::metrics))
        // Add state and CORS
        .with_state(state)
        .layer(cors)
}
