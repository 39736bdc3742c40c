use std::io;
use std::process::ExitCode;

use anyhow::Result;
use solar_inference::{
    batch::{self, BatchOutcome},
    config::Config,
    ml::{ArtifactError, Variant},
    pipeline::InferenceContext,
    telemetry,
};
use tracing::error;

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    telemetry::init_stderr_tracing();

    match run() {
        Ok(BatchOutcome::Answered) => ExitCode::SUCCESS,
        Ok(BatchOutcome::MalformedInput) => ExitCode::from(2),
        Err(e) => {
            error!(error = %format!("{e:#}"), "batch prediction failed");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<BatchOutcome> {
    let cfg = Config::load()?;
    let path = cfg
        .models
        .path_for(Variant::Generation)
        .ok_or(ArtifactError::NotConfigured(Variant::Generation))?;
    let context =
        InferenceContext::new().load(Variant::Generation, path, cfg.inference.post_processing())?;
    let engine = context.require(Variant::Generation)?;

    batch::run(engine, io::stdin().lock(), io::stdout().lock())
}
