#![allow(dead_code)]

use std::path::PathBuf;

use solar_inference::ml::schema::{CONSUMPTION_V1, GENERATION_V1, SOURCE_V1};
use solar_inference::ml::{
    CategoricalVocabulary, ForestModel, LinearRegressionModel, ModelArtifact, ModelSpec, TreeNode,
    Variant,
};
use solar_inference::ml::{ModelMetadata, ModelType};
use tempfile::TempDir;

pub const SOURCE_KEYS: &[&str] = &["1BY6WEcLGh8j5v7", "1IF53ai7Xc0U56Y", "3PZuoBAID5Wc2HD"];

fn metadata(variant: Variant, model_type: ModelType) -> ModelMetadata {
    ModelMetadata {
        model_id: format!("{variant}_fixture"),
        model_type,
        version: "1".to_string(),
        trained_at: chrono::Utc::now(),
        training_samples: 68_778,
        feature_names: variant.schema().slot_names(),
    }
}

/// predictedPower = 0.75 * irradiation - 20
pub fn generation_artifact() -> ModelArtifact {
    let mut coefficients = vec![0.0; GENERATION_V1.width()];
    coefficients[0] = 0.75;
    ModelArtifact {
        metadata: metadata(Variant::Generation, ModelType::LinearRegression),
        model: ModelSpec::Linear(LinearRegressionModel::new(coefficients, -20.0)),
        vocabulary: None,
    }
}

/// Two-tree forest on irradiation and the encoded source key
pub fn source_artifact() -> ModelArtifact {
    let irradiation = SOURCE_V1.index_of("IRRADIATION").unwrap();
    let source = SOURCE_V1.index_of("SOURCE_ENCODED").unwrap();
    let trees = vec![
        TreeNode::split(irradiation, 0.5, TreeNode::leaf(100.0), TreeNode::leaf(900.0)),
        TreeNode::split(source, 0.5, TreeNode::leaf(200.0), TreeNode::leaf(400.0)),
    ];
    let vocabulary =
        CategoricalVocabulary::new(SOURCE_KEYS.iter().map(|k| k.to_string()).collect()).unwrap();
    ModelArtifact {
        metadata: metadata(Variant::Source, ModelType::RandomForest),
        model: ModelSpec::Forest(ForestModel::new(trees)),
        vocabulary: Some(vocabulary),
    }
}

/// predicted_load = 2 * hour + 1, or negative for every hour with `negative`
pub fn consumption_artifact(negative: bool) -> ModelArtifact {
    let (coefficients, intercept) = if negative {
        (vec![0.0; CONSUMPTION_V1.width()], -5.0)
    } else {
        (vec![2.0, 0.0, 0.0], 1.0)
    };
    ModelArtifact {
        metadata: metadata(Variant::Consumption, ModelType::LinearRegression),
        model: ModelSpec::Linear(LinearRegressionModel::new(coefficients, intercept)),
        vocabulary: None,
    }
}

pub struct Fixture {
    pub dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn write(&self, name: &str, artifact: &ModelArtifact) -> PathBuf {
        let path = self.dir.path().join(name);
        artifact.save(&path).unwrap();
        path
    }
}
