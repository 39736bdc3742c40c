//! ML Model Definitions
//!
//! Regression models that can be carried inside an artifact.

use super::ModelType;
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Trait for regression models evaluated on a single schema-ordered row
pub trait Regressor: Send + Sync {
    /// Predict a value from one row of features
    fn predict(&self, row: &[f64]) -> Result<f64>;

    /// Number of inputs the model was fitted on, when the model records it
    fn input_width(&self) -> Option<usize> {
        None
    }
}

/// Simple Linear Regression Model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearRegressionModel {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LinearRegressionModel {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Self {
        Self {
            coefficients,
            intercept,
        }
    }
}

impl Regressor for LinearRegressionModel {
    fn predict(&self, row: &[f64]) -> Result<f64> {
        if row.len() != self.coefficients.len() {
            anyhow::bail!(
                "Feature count mismatch: expected {}, got {}",
                self.coefficients.len(),
                row.len()
            );
        }

        Ok(row
            .iter()
            .zip(self.coefficients.iter())
            .map(|(f, c)| f * c)
            .sum::<f64>()
            + self.intercept)
    }

    fn input_width(&self) -> Option<usize> {
        Some(self.coefficients.len())
    }
}

/// Regression tree node
///
/// Rows with `row[feature_idx] <= threshold` descend left.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeNode {
    Leaf {
        value: f64,
    },
    Split {
        feature_idx: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

impl TreeNode {
    pub fn leaf(value: f64) -> Self {
        TreeNode::Leaf { value }
    }

    pub fn split(feature_idx: usize, threshold: f64, left: TreeNode, right: TreeNode) -> Self {
        TreeNode::Split {
            feature_idx,
            threshold,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    fn evaluate(&self, row: &[f64]) -> Result<f64> {
        let mut node = self;
        loop {
            match node {
                TreeNode::Leaf { value } => return Ok(*value),
                TreeNode::Split {
                    feature_idx,
                    threshold,
                    left,
                    right,
                } => {
                    let x = row.get(*feature_idx).ok_or_else(|| {
                        anyhow::anyhow!(
                            "Split on feature {} but row has {} features",
                            feature_idx,
                            row.len()
                        )
                    })?;
                    node = if *x <= *threshold { left } else { right };
                }
            }
        }
    }

    /// Highest feature index any split reads
    pub fn max_feature_index(&self) -> Option<usize> {
        match self {
            TreeNode::Leaf { .. } => None,
            TreeNode::Split {
                feature_idx,
                left,
                right,
                ..
            } => [Some(*feature_idx), left.max_feature_index(), right.max_feature_index()]
                .into_iter()
                .flatten()
                .max(),
        }
    }
}

/// Random forest exported as explicit trees; the prediction is the tree mean
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestModel {
    pub trees: Vec<TreeNode>,
}

impl ForestModel {
    pub fn new(trees: Vec<TreeNode>) -> Self {
        Self { trees }
    }

    pub fn max_feature_index(&self) -> Option<usize> {
        self.trees.iter().filter_map(TreeNode::max_feature_index).max()
    }
}

impl Regressor for ForestModel {
    fn predict(&self, row: &[f64]) -> Result<f64> {
        if self.trees.is_empty() {
            anyhow::bail!("Forest has no trees");
        }

        let mut sum = 0.0;
        for tree in &self.trees {
            sum += tree.evaluate(row)?;
        }
        Ok(sum / self.trees.len() as f64)
    }
}

/// Model payload of an artifact
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelSpec {
    Linear(LinearRegressionModel),
    Forest(ForestModel),
    #[cfg(feature = "ml")]
    SmartcoreForest(super::smartcore::SmartcoreRandomForest),
}

impl ModelSpec {
    pub fn model_type(&self) -> ModelType {
        match self {
            ModelSpec::Linear(_) => ModelType::LinearRegression,
            ModelSpec::Forest(_) => ModelType::RandomForest,
            #[cfg(feature = "ml")]
            ModelSpec::SmartcoreForest(_) => ModelType::RandomForest,
        }
    }

    pub fn regressor(&self) -> &dyn Regressor {
        match self {
            ModelSpec::Linear(m) => m,
            ModelSpec::Forest(m) => m,
            #[cfg(feature = "ml")]
            ModelSpec::SmartcoreForest(m) => m,
        }
    }

    /// Decode any lazily serialized state after the artifact is read
    pub fn prepare(&mut self) -> Result<()> {
        match self {
            #[cfg(feature = "ml")]
            ModelSpec::SmartcoreForest(m) => m.restore_from_serialization(),
            _ => Ok(()),
        }
    }

    /// Check the model can consume rows of `width` features
    pub fn check_width(&self, width: usize) -> Result<()> {
        if let Some(expected) = self.regressor().input_width() {
            if expected != width {
                anyhow::bail!("model expects {} inputs, schema has {}", expected, width);
            }
        }
        if let ModelSpec::Forest(forest) = self {
            if forest.trees.is_empty() {
                anyhow::bail!("forest has no trees");
            }
            if let Some(idx) = forest.max_feature_index() {
                if idx >= width {
                    anyhow::bail!("tree splits on feature {} but schema has {}", idx, width);
                }
            }
        }
        Ok(())
    }
}
