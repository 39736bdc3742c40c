//! Model artifact loading
//!
//! An artifact is the record the training side hands over: metadata, the
//! model payload and, for source-keyed models, the categorical vocabulary.
//! `.json` files are read with serde_json, `.bin` files with bincode.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use super::{CategoricalVocabulary, ModelMetadata, ModelSpec, Variant};

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to read artifact {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode artifact {}: {detail}", path.display())]
    Decode { path: PathBuf, detail: String },

    #[error("failed to encode artifact {}: {detail}", path.display())]
    Encode { path: PathBuf, detail: String },

    #[error("unsupported artifact format for {} (expected .json or .bin)", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("{variant} artifact columns {found:?} do not match schema v{version} {expected:?}")]
    SchemaMismatch {
        variant: Variant,
        version: u32,
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("{variant} artifact model is incompatible with its schema: {detail}")]
    IncompatibleModel { variant: Variant, detail: String },

    #[error("{0} artifact has no categorical vocabulary")]
    MissingVocabulary(Variant),

    #[error("{0} artifact is required but not configured")]
    NotConfigured(Variant),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Encoding {
    Json,
    Bincode,
}

impl Encoding {
    fn from_path(path: &Path) -> Result<Self, ArtifactError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(Encoding::Json),
            Some("bin") => Ok(Encoding::Bincode),
            _ => Err(ArtifactError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub metadata: ModelMetadata,
    pub model: ModelSpec,
    #[serde(default)]
    pub vocabulary: Option<CategoricalVocabulary>,
}

impl ModelArtifact {
    /// Read an artifact from disk and check it against `variant`'s schema
    pub fn load(path: impl AsRef<Path>, variant: Variant) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        let encoding = Encoding::from_path(path)?;
        let bytes = fs::read(path).map_err(|source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let decode_err = |detail: String| ArtifactError::Decode {
            path: path.to_path_buf(),
            detail,
        };
        let mut artifact: ModelArtifact = match encoding {
            Encoding::Json => serde_json::from_slice(&bytes).map_err(|e| decode_err(e.to_string()))?,
            Encoding::Bincode => bincode::deserialize(&bytes).map_err(|e| decode_err(e.to_string()))?,
        };
        artifact
            .model
            .prepare()
            .map_err(|e| decode_err(e.to_string()))?;
        artifact.verify(variant)?;

        info!(
            path = %path.display(),
            %variant,
            model_id = %artifact.metadata.model_id,
            model_type = %artifact.metadata.model_type,
            version = %artifact.metadata.version,
            vocabulary = artifact.vocabulary.as_ref().map(|v| v.len()).unwrap_or(0),
            "model artifact loaded"
        );
        Ok(artifact)
    }

    /// Write the artifact in the encoding implied by the file extension
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ArtifactError> {
        let path = path.as_ref();
        let bytes = match Encoding::from_path(path)? {
            Encoding::Json => serde_json::to_vec_pretty(self).map_err(|e| e.to_string()),
            Encoding::Bincode => bincode::serialize(self).map_err(|e| e.to_string()),
        }
        .map_err(|detail| ArtifactError::Encode {
            path: path.to_path_buf(),
            detail,
        })?;
        fs::write(path, bytes).map_err(|source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Startup check: training columns, model width and vocabulary presence
    pub fn verify(&self, variant: Variant) -> Result<(), ArtifactError> {
        let schema = variant.schema();
        if !schema.matches_columns(&self.metadata.feature_names) {
            return Err(ArtifactError::SchemaMismatch {
                variant,
                version: schema.version,
                expected: schema.slot_names(),
                found: self.metadata.feature_names.clone(),
            });
        }

        self.model
            .check_width(schema.width())
            .map_err(|e| ArtifactError::IncompatibleModel {
                variant,
                detail: e.to_string(),
            })?;

        if variant.requires_vocabulary() && self.vocabulary.is_none() {
            return Err(ArtifactError::MissingVocabulary(variant));
        }
        Ok(())
    }
}
