//! One-shot batch prediction: a single JSON request in, a single JSON
//! response line out.

use std::io::{Read, Write};

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::warn;

use crate::ml::InferenceEngine;
use crate::pipeline::{self, PredictionResponse};

/// What was written to the output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcome {
    /// A prediction or a data-level error object
    Answered,
    /// Input was not JSON; an error object was written anyway
    MalformedInput,
}

/// Read one request from `input`, write exactly one JSON object and a newline
/// to `output`. Only I/O failures are returned as `Err`.
pub fn run<R: Read, W: Write>(engine: &InferenceEngine, mut input: R, mut output: W) -> Result<BatchOutcome> {
    let mut raw = String::new();
    input.read_to_string(&mut raw).context("failed to read request")?;

    let (response, outcome) = match serde_json::from_str::<Value>(&raw) {
        Ok(body) => (pipeline::predict(engine, &body), BatchOutcome::Answered),
        Err(e) => {
            warn!(error = %e, "request is not valid JSON");
            (
                PredictionResponse::error(format!("invalid JSON input: {e}")),
                BatchOutcome::MalformedInput,
            )
        }
    };

    serde_json::to_writer(&mut output, &response).context("failed to write response")?;
    output.write_all(b"\n")?;
    output.flush()?;
    Ok(outcome)
}
