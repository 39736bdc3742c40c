//! Inference request pipeline
//!
//! `validate -> build features -> infer -> format`, one linear pass per
//! request. The only shared state is the immutable [`InferenceContext`] built
//! at startup.

pub mod error;
pub mod features;
pub mod response;
pub mod validate;

use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;

use serde_json::Value;
use tracing::{info, warn};

use crate::config::{InferenceConfig, ModelsConfig};
use crate::ml::{ArtifactError, InferenceEngine, ModelArtifact, PostProcessing, Variant};

pub use error::{PipelineError, RangeViolation, ValidationError};
pub use response::PredictionResponse;

/// Loaded artifacts, one optional engine per variant
#[derive(Debug, Default)]
pub struct InferenceContext {
    engines: HashMap<Variant, InferenceEngine>,
}

impl InferenceContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every configured artifact; any load or schema failure is fatal
    pub fn from_config(models: &ModelsConfig, inference: &InferenceConfig) -> Result<Self, ArtifactError> {
        let post = inference.post_processing();
        let mut ctx = Self::new();
        for variant in Variant::ALL {
            if let Some(path) = models.path_for(variant) {
                ctx = ctx.load(variant, path, post)?;
            }
        }
        Ok(ctx)
    }

    pub fn load(self, variant: Variant, path: &Path, post: PostProcessing) -> Result<Self, ArtifactError> {
        let artifact = ModelArtifact::load(path, variant)?;
        Ok(self.with_engine(InferenceEngine::new(variant, artifact, post)?))
    }

    /// Register an engine, replacing any earlier one for the same variant
    pub fn with_engine(mut self, engine: InferenceEngine) -> Self {
        self.engines.insert(engine.variant(), engine);
        self
    }

    /// Fail startup when a variant this process must serve has no artifact
    pub fn require(&self, variant: Variant) -> Result<&InferenceEngine, ArtifactError> {
        self.engine(variant).ok_or(ArtifactError::NotConfigured(variant))
    }

    pub fn engine(&self, variant: Variant) -> Option<&InferenceEngine> {
        self.engines.get(&variant)
    }

    pub fn loaded(&self) -> impl Iterator<Item = &InferenceEngine> {
        Variant::ALL.into_iter().filter_map(|v| self.engine(v))
    }

    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }
}

/// Generation request against `engine` (environment + timestamp)
pub fn predict_generation(engine: &InferenceEngine, raw: &Value) -> PredictionResponse {
    run(engine, || {
        let input = validate::validate_generation(raw)?;
        let features = features::build_generation(&input)?;
        let value = engine.predict(&features)?;
        Ok(PredictionResponse::generation(input, value))
    })
}

/// Source-keyed request against `engine` (environment + calendar + source)
pub fn predict_source(engine: &InferenceEngine, raw: &Value) -> PredictionResponse {
    run(engine, || {
        let input = validate::validate_source(raw)?;
        let vocabulary = engine
            .vocabulary()
            .ok_or_else(|| PipelineError::Inference("artifact has no vocabulary".to_string()))?;
        let features = features::build_source(&input, vocabulary)?;
        let value = engine.predict(&features)?;
        Ok(PredictionResponse::source(input, value))
    })
}

/// Consumption request against `engine` (calendar only)
pub fn predict_consumption(engine: &InferenceEngine, raw: &Value) -> PredictionResponse {
    run(engine, || {
        let input = validate::validate_consumption(raw)?;
        let features = features::build_consumption(&input)?;
        let value = engine.predict(&features)?;
        Ok(PredictionResponse::consumption(input, value))
    })
}

/// Dispatch on variant; used where the variant is only known at runtime
pub fn predict(engine: &InferenceEngine, raw: &Value) -> PredictionResponse {
    match engine.variant() {
        Variant::Generation => predict_generation(engine, raw),
        Variant::Source => predict_source(engine, raw),
        Variant::Consumption => predict_consumption(engine, raw),
    }
}

fn run<F>(engine: &InferenceEngine, stages: F) -> PredictionResponse
where
    F: FnOnce() -> Result<PredictionResponse, PipelineError>,
{
    let start = Instant::now();
    let outcome = stages();
    let elapsed_us = start.elapsed().as_micros() as u64;
    let variant = engine.variant();

    match &outcome {
        Ok(_) => info!(%variant, elapsed_us, "prediction served"),
        Err(e) => warn!(%variant, kind = e.kind(), error = %e, elapsed_us, "prediction rejected"),
    }
    response::format(outcome)
}
