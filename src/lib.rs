pub mod api;
pub mod batch;
pub mod config;
pub mod ml;
pub mod pipeline;
pub mod telemetry;
