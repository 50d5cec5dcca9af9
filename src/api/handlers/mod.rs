pub mod predict;
pub mod system;

pub use predict::{predict, predict_batch};
pub use system::{health, liveness, metrics, model_info, readiness, root};

use axum::http::StatusCode;
use axum::Json;

use crate::api::types::ErrorBody;

/// Shorthand for the error arm every handler returns.
pub(crate) fn reject(
    status: StatusCode,
    detail: impl Into<String>,
) -> (StatusCode, Json<ErrorBody>) {
    (status, Json(ErrorBody::new(detail)))
}
