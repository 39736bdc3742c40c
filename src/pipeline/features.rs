//! Feature engineering for the serving pipeline
//!
//! Builds schema-ordered rows from validated requests. Hour and minute are
//! periodic, so each is encoded as a (sin, cos) pair; a raw integer would put
//! 23:00 and 00:00 at opposite ends of the feature space.

use std::f64::consts::PI;

use chrono::Timelike;

use super::error::PipelineError;
use super::validate::{ConsumptionInput, GenerationInput, SourceInput};
use crate::ml::schema::{CONSUMPTION_V1, GENERATION_V1, SOURCE_V1};
use crate::ml::{CategoricalVocabulary, FeatureSchema, FeatureVector};

/// Sine/cosine encoding of hour-of-day and minute-of-hour
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CyclicalTime {
    pub hour_sin: f64,
    pub hour_cos: f64,
    pub minute_sin: f64,
    pub minute_cos: f64,
}

pub fn encode_cyclical(hour: u32, minute: u32) -> CyclicalTime {
    let (hour_sin, hour_cos) = cyclical(hour as f64, 24.0);
    let (minute_sin, minute_cos) = cyclical(minute as f64, 60.0);
    CyclicalTime {
        hour_sin,
        hour_cos,
        minute_sin,
        minute_cos,
    }
}

fn cyclical(value: f64, period: f64) -> (f64, f64) {
    let angle = 2.0 * PI * value / period;
    (angle.sin(), angle.cos())
}

pub fn build_generation(input: &GenerationInput) -> Result<FeatureVector, PipelineError> {
    let time = encode_cyclical(input.timestamp.hour(), input.timestamp.minute());
    row(
        &GENERATION_V1,
        vec![
            input.irradiation,
            input.ambient_temp,
            input.module_temp,
            time.hour_sin,
            time.hour_cos,
            time.minute_sin,
            time.minute_cos,
        ],
    )
}

/// Unknown source keys are rejected; there is no fallback code
pub fn build_source(
    input: &SourceInput,
    vocabulary: &CategoricalVocabulary,
) -> Result<FeatureVector, PipelineError> {
    let encoded = vocabulary
        .lookup(&input.source_key)
        .ok_or_else(|| PipelineError::UnknownCategory {
            key: input.source_key.clone(),
        })?;
    tracing::debug!(source_key = %input.source_key, encoded, "source key encoded");

    row(
        &SOURCE_V1,
        vec![
            input.ambient_temp,
            input.module_temp,
            input.irradiation,
            input.calendar.hour as f64,
            input.calendar.day as f64,
            input.calendar.month as f64,
            encoded as f64,
        ],
    )
}

pub fn build_consumption(input: &ConsumptionInput) -> Result<FeatureVector, PipelineError> {
    row(
        &CONSUMPTION_V1,
        vec![
            input.calendar.hour as f64,
            input.calendar.day as f64,
            input.calendar.month as f64,
        ],
    )
}

fn row(schema: &'static FeatureSchema, values: Vec<f64>) -> Result<FeatureVector, PipelineError> {
    FeatureVector::new(schema, values).map_err(|e| PipelineError::Inference(e.to_string()))
}
