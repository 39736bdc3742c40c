use anyhow::Result;
use solar_inference::{api, config, ml::Variant, pipeline::InferenceContext, telemetry};
use config::Config;
use telemetry::init_tracing;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cfg = Config::load()?;

    let context = InferenceContext::from_config(&cfg.models, &cfg.inference)?;
    context.require(Variant::Source)?;
    for engine in context.loaded() {
        let meta = &engine.artifact().metadata;
        info!(
            variant = %engine.variant(),
            model_id = %meta.model_id,
            model_type = %meta.model_type,
            version = %meta.version,
            "model ready"
        );
    }

    let app = api::router(api::AppState::new(context), &cfg.server);

    let addr = cfg.server.socket_addr()?;

    if cfg.server.host == "0.0.0.0" {
        warn!("server binding to 0.0.0.0 - service will be accessible from the network");
    }

    info!(%addr, "starting solar inference service");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(telemetry::shutdown_signal())
        .await?;

    warn!("shutdown complete");
    Ok(())
}
