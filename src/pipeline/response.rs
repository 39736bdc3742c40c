//! Response shapes
//!
//! A response is either a prediction with the echoed inputs or a bare
//! `{"error": ...}` object, never both.

use serde::Serialize;

use super::error::PipelineError;
use super::validate::{CalendarFields, ConsumptionInput, GenerationInput, SourceInput};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PredictionResponse {
    Generation(GenerationPrediction),
    Source(SourcePrediction),
    Consumption(ConsumptionPrediction),
    Error(ErrorBody),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationPrediction {
    pub predicted_power: f64,
    pub irradiation: f64,
    pub ambient_temp: f64,
    pub module_temp: f64,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourcePrediction {
    pub predicted_dc_power: f64,
    pub ambient_temp: f64,
    pub module_temp: f64,
    pub irradiation: f64,
    pub hour: u32,
    pub day: u32,
    pub month: u32,
    pub source_key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsumptionPrediction {
    pub predicted_load: f64,
    pub hour: u32,
    pub day: u32,
    pub month: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl PredictionResponse {
    pub fn error(message: impl Into<String>) -> Self {
        PredictionResponse::Error(ErrorBody {
            error: message.into(),
        })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, PredictionResponse::Error(_))
    }

    pub fn generation(input: GenerationInput, value: f64) -> Self {
        PredictionResponse::Generation(GenerationPrediction {
            predicted_power: value,
            irradiation: input.irradiation,
            ambient_temp: input.ambient_temp,
            module_temp: input.module_temp,
            time: input.raw_time,
        })
    }

    pub fn source(input: SourceInput, value: f64) -> Self {
        let CalendarFields { hour, day, month } = input.calendar;
        PredictionResponse::Source(SourcePrediction {
            predicted_dc_power: value,
            ambient_temp: input.ambient_temp,
            module_temp: input.module_temp,
            irradiation: input.irradiation,
            hour,
            day,
            month,
            source_key: input.source_key,
        })
    }

    pub fn consumption(input: ConsumptionInput, value: f64) -> Self {
        let CalendarFields { hour, day, month } = input.calendar;
        PredictionResponse::Consumption(ConsumptionPrediction {
            predicted_load: value,
            hour,
            day,
            month,
        })
    }
}

impl From<PipelineError> for PredictionResponse {
    fn from(err: PipelineError) -> Self {
        PredictionResponse::error(err.to_string())
    }
}

/// Collapse a pipeline outcome into the single response shape
pub fn format(outcome: Result<PredictionResponse, PipelineError>) -> PredictionResponse {
    outcome.unwrap_or_else(PredictionResponse::from)
}
