use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde_json::Value;
use tracing::info_span;
use uuid::Uuid;

use super::{error::ApiError, AppState};
use crate::ml::Variant;
use crate::pipeline::{self, PredictionResponse};

type PredictResult = Result<Json<PredictionResponse>, ApiError>;

/// POST /predict - source-keyed DC power
///
/// Data errors answer 200 with `{"error": ...}`; only an unreadable body is a 400.
pub async fn predict_source(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> PredictResult {
    serve(&state, Variant::Source, payload)
}

/// POST /predict/generation
pub async fn predict_generation(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> PredictResult {
    serve(&state, Variant::Generation, payload)
}

/// POST /predict/consumption
pub async fn predict_consumption(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> PredictResult {
    serve(&state, Variant::Consumption, payload)
}

fn serve(
    state: &AppState,
    variant: Variant,
    payload: Result<Json<Value>, JsonRejection>,
) -> PredictResult {
    let request_id = Uuid::new_v4();
    let span = info_span!("predict", %request_id, %variant);
    let _guard = span.enter();

    let Json(body) = payload?;
    let engine = state
        .context
        .engine(variant)
        .ok_or_else(|| ApiError::NotFound(format!("no {variant} model loaded")))?;

    Ok(Json(pipeline::predict(engine, &body)))
}
