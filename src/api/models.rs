use axum::{extract::State, Json};
use serde::Serialize;

use super::AppState;
use crate::ml::{InferenceEngine, ModelMetadata, Variant};

#[derive(Debug, Serialize)]
pub struct LoadedModel {
    pub variant: Variant,
    pub schema_version: u32,
    pub metadata: ModelMetadata,
    pub vocabulary_size: Option<usize>,
}

impl From<&InferenceEngine> for LoadedModel {
    fn from(engine: &InferenceEngine) -> Self {
        Self {
            variant: engine.variant(),
            schema_version: engine.variant().schema().version,
            metadata: engine.artifact().metadata.clone(),
            vocabulary_size: engine.vocabulary().map(|v| v.len()),
        }
    }
}

/// GET /models - metadata of every loaded artifact
pub async fn list_models(State(state): State<AppState>) -> Json<Vec<LoadedModel>> {
    Json(state.context.loaded().map(LoadedModel::from).collect())
}
