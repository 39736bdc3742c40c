//! ML Model Inference Engine
//!
//! Runs a loaded artifact on one schema-ordered row and applies the serving
//! post-processing: negative outputs are clamped to zero unless disabled, and
//! the result is rounded to the configured precision.

use super::{ArtifactError, CategoricalVocabulary, FeatureVector, ModelArtifact, Variant};
use crate::pipeline::error::{inference_error, PipelineError};

/// Post-processing applied to every raw model output
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PostProcessing {
    /// Decimal places kept; `None` keeps full precision
    pub decimals: Option<u32>,
    pub clamp_negative: bool,
}

impl Default for PostProcessing {
    fn default() -> Self {
        Self {
            decimals: Some(2),
            clamp_negative: true,
        }
    }
}

impl PostProcessing {
    pub fn apply(&self, raw: f64) -> f64 {
        let clamped = if self.clamp_negative && raw < 0.0 { 0.0 } else { raw };
        match self.decimals {
            Some(d) => {
                let factor = 10f64.powi(d as i32);
                let scaled = clamped * factor;
                // Values this large carry no fractional digits to round
                if scaled.is_finite() {
                    scaled.round() / factor
                } else {
                    clamped
                }
            }
            None => clamped,
        }
    }
}

/// One loaded artifact bound to the variant it serves
#[derive(Debug)]
pub struct InferenceEngine {
    variant: Variant,
    artifact: ModelArtifact,
    post: PostProcessing,
}

impl InferenceEngine {
    /// Bind an artifact to `variant`, re-checking it against the schema
    pub fn new(
        variant: Variant,
        artifact: ModelArtifact,
        post: PostProcessing,
    ) -> Result<Self, ArtifactError> {
        artifact.verify(variant)?;
        Ok(Self {
            variant,
            artifact,
            post,
        })
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn artifact(&self) -> &ModelArtifact {
        &self.artifact
    }

    pub fn vocabulary(&self) -> Option<&CategoricalVocabulary> {
        self.artifact.vocabulary.as_ref()
    }

    /// Raw model output for one row, before post-processing
    pub fn predict_raw(&self, features: &FeatureVector) -> Result<f64, PipelineError> {
        let schema = self.variant.schema();
        if features.schema() != schema {
            return Err(inference_error(
                self.variant,
                format!(
                    "feature row built for {} schema, model serves {}",
                    features.schema().variant,
                    schema.variant
                ),
            ));
        }

        let value = self
            .artifact
            .model
            .regressor()
            .predict(features.values())
            .map_err(|e| inference_error(self.variant, e))?;

        if !value.is_finite() {
            return Err(inference_error(
                self.variant,
                format!("model returned non-finite value {}", value),
            ));
        }
        Ok(value)
    }

    pub fn predict(&self, features: &FeatureVector) -> Result<f64, PipelineError> {
        let raw = self.predict_raw(features)?;
        let value = self.post.apply(raw);
        if !value.is_finite() {
            return Err(inference_error(
                self.variant,
                format!("post-processed value {} is not finite", value),
            ));
        }
        tracing::debug!(
            variant = %self.variant,
            features = ?features.named().collect::<Vec<_>>(),
            raw,
            value,
            "prediction"
        );
        Ok(value)
    }
}
