//! Machine Learning Module
//!
//! Serving-side model support:
//! - Versioned feature schemas shared with the training columns
//! - Pre-trained model artifacts (linear, tree forest, optional smartcore)
//! - Categorical vocabularies bundled with source-keyed artifacts
//! - Inference engine with post-processing
//!
//! Training happens elsewhere; this module only loads and evaluates artifacts.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use strum::Display;

pub mod artifact;
pub mod inference;
pub mod models;
pub mod schema;
pub mod vocabulary;

#[cfg(feature = "ml")]
pub mod smartcore;

pub use artifact::{ArtifactError, ModelArtifact};
pub use inference::{InferenceEngine, PostProcessing};
pub use models::{ForestModel, LinearRegressionModel, ModelSpec, Regressor, TreeNode};
pub use schema::{FeatureSchema, Variant};
pub use vocabulary::CategoricalVocabulary;

/// ML Model Type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ModelType {
    LinearRegression,
    RandomForest,
}

/// Metadata recorded by the training side alongside the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_id: String,
    pub model_type: ModelType,
    pub version: String,
    pub trained_at: chrono::DateTime<chrono::Utc>,
    pub training_samples: usize,
    /// Training columns, in the order the model consumes them
    pub feature_names: Vec<String>,
}

/// Single input row laid out in schema order
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    schema: &'static FeatureSchema,
    values: Vec<f64>,
}

impl FeatureVector {
    pub fn new(schema: &'static FeatureSchema, values: Vec<f64>) -> Result<Self> {
        if values.len() != schema.width() {
            anyhow::bail!(
                "Feature count mismatch for {} schema v{}: {} values, {} slots",
                schema.variant,
                schema.version,
                values.len(),
                schema.width()
            );
        }
        Ok(Self { schema, values })
    }

    pub fn schema(&self) -> &'static FeatureSchema {
        self.schema
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value of a named slot
    pub fn get(&self, slot: &str) -> Option<f64> {
        self.schema.index_of(slot).map(|i| self.values[i])
    }

    /// (slot, value) pairs in schema order
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.schema.slots.iter().copied().zip(self.values.iter().copied())
    }
}
