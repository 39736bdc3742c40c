use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use serde_json::{json, Value};

use super::{error::ApiError, AppState};
use crate::ml::Variant;

pub const ROOT_MESSAGE: &str = "Solar Prediction API is running!";

/// GET / - static liveness message
pub async fn root() -> Json<Value> {
    Json(json!({ "message": ROOT_MESSAGE }))
}

/// GET /health/live - Liveness probe
///
/// Returns 200 if the process is running
pub async fn liveness_check() -> impl IntoResponse {
    StatusCode::OK
}

#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    status: &'static str,
    timestamp: chrono::DateTime<chrono::Utc>,
    variants: Vec<Variant>,
}

/// GET /health/ready - Readiness probe
///
/// Returns 200 once at least one artifact is loaded
pub async fn readiness_check(
    State(state): State<AppState>,
) -> Result<Json<ReadinessResponse>, ApiError> {
    if state.context.is_empty() {
        return Err(ApiError::ServiceUnavailable("no model artifact loaded".to_string()));
    }
    Ok(Json(ReadinessResponse {
        status: "ready",
        timestamp: chrono::Utc::now(),
        variants: state.context.loaded().map(|e| e.variant()).collect(),
    }))
}
