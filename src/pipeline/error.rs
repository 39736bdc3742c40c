use thiserror::Error;

use crate::ml::Variant;

/// Errors a prediction request can end in; all of them become response data
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Unknown SOURCE_KEY")]
    UnknownCategory { key: String },

    #[error("Inference failed: {0}")]
    Inference(String),
}

impl PipelineError {
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Validation(_) => "validation",
            PipelineError::UnknownCategory { .. } => "unknown_category",
            PipelineError::Inference(_) => "inference",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("request body must be a JSON object")]
    NotAnObject,

    #[error("field '{0}' missing")]
    MissingField(&'static str),

    #[error("field '{field}' invalid: expected {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },

    #[error("{0}")]
    OutOfRange(RangeViolation),

    #[error("invalid dateTime '{raw}': {detail}")]
    InvalidTimestamp { raw: String, detail: String },
}

/// Physical or calendar bound a field violated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RangeViolation {
    #[error("Irradiation should be between 0-1500 W/m²")]
    Irradiation,
    #[error("Ambient temperature out of range")]
    AmbientTemperature,
    #[error("Module temperature out of range")]
    ModuleTemperature,
    #[error("Hour should be between 0-23")]
    Hour,
    #[error("Day should be between 1-31")]
    Day,
    #[error("Month should be between 1-12")]
    Month,
}

impl From<RangeViolation> for PipelineError {
    fn from(v: RangeViolation) -> Self {
        PipelineError::Validation(ValidationError::OutOfRange(v))
    }
}

/// Context attached to inference failures in logs
pub(crate) fn inference_error(variant: Variant, detail: impl std::fmt::Display) -> PipelineError {
    tracing::error!(%variant, error = %detail, "model inference failed");
    PipelineError::Inference(detail.to_string())
}
