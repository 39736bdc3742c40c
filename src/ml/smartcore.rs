//! SmartCore ML Model Wrapper
//!
//! Artifacts produced by a Rust training job can carry a smartcore
//! `RandomForestRegressor` as bincode bytes. The bytes are decoded once when
//! the artifact is loaded.

use super::models::Regressor;
use anyhow::Result;
use serde::{Deserialize, Serialize};

use smartcore::ensemble::random_forest_regressor::RandomForestRegressor;
use smartcore::linalg::basic::matrix::DenseMatrix;

type Forest = RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

#[derive(Debug, Serialize, Deserialize)]
pub struct SmartcoreRandomForest {
    #[serde(skip)]
    model: Option<Forest>,
    /// Serialized model bytes (for persistence)
    model_bytes: Vec<u8>,
    /// Number of features the forest was fitted on
    pub n_features: usize,
}

impl SmartcoreRandomForest {
    /// Wrap a fitted forest, serializing it for persistence
    pub fn from_model(model: Forest, n_features: usize) -> Result<Self> {
        let model_bytes = bincode::serialize(&model)
            .map_err(|e| anyhow::anyhow!("Failed to serialize model: {}", e))?;
        Ok(Self {
            model: Some(model),
            model_bytes,
            n_features,
        })
    }

    /// Restore model from serialized bytes
    pub fn restore_from_serialization(&mut self) -> Result<()> {
        let model: Forest = bincode::deserialize(&self.model_bytes)
            .map_err(|e| anyhow::anyhow!("Failed to deserialize model: {}", e))?;
        self.model = Some(model);
        Ok(())
    }
}

impl Regressor for SmartcoreRandomForest {
    fn predict(&self, row: &[f64]) -> Result<f64> {
        let model = self
            .model
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("Model not loaded"))?;

        if row.len() != self.n_features {
            anyhow::bail!(
                "Feature count mismatch: expected {}, got {}",
                self.n_features,
                row.len()
            );
        }

        // 1 row, n features
        let x = DenseMatrix::new(1, row.len(), row.to_vec(), false);
        let predictions = model
            .predict(&x)
            .map_err(|e| anyhow::anyhow!("Prediction failed: {:?}", e))?;

        predictions
            .first()
            .copied()
            .ok_or_else(|| anyhow::anyhow!("Model returned empty predictions"))
    }

    fn input_width(&self) -> Option<usize> {
        Some(self.n_features)
    }
}
