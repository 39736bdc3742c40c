pub mod error;
pub mod health;
pub mod models;
pub mod predict;

use axum::{
    extract::DefaultBodyLimit,
    http::{StatusCode, Uri},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::{config::ServerConfig, ml::Variant, pipeline::InferenceContext};
use error::ApiError;

/// Shared, read-only state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub context: Arc<InferenceContext>,
}

impl AppState {
    pub fn new(context: InferenceContext) -> Self {
        Self {
            context: Arc::new(context),
        }
    }
}

/// Prediction routes are mounted only for variants with a loaded artifact
pub fn router(state: AppState, cfg: &ServerConfig) -> Router {
    let mut router = Router::new()
        .route("/", get(health::root))
        .route("/health/live", get(health::liveness_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/models", get(models::list_models));

    for engine in state.context.loaded() {
        router = match engine.variant() {
            Variant::Source => router.route("/predict", post(predict::predict_source)),
            Variant::Generation => {
                router.route("/predict/generation", post(predict::predict_generation))
            }
            Variant::Consumption => {
                router.route("/predict/consumption", post(predict::predict_consumption))
            }
        };
    }

    router
        .fallback(not_found)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(DefaultBodyLimit::max(cfg.body_limit_bytes))
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    Duration::from_secs(cfg.request_timeout_secs),
                )),
        )
        .layer(TraceLayer::new_for_http())
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(uri.path().to_string())
}
