#![doc = include_str!("../README.md")]
#![deny(clippy::all)]

use std::ffi::OsString;

use anyhow::Context;
use clap::Parser;

pub mod config;
pub mod engine;
pub mod envelope;
pub mod error;
pub mod params;
pub mod routes;
pub mod workspace;

pub use config::{GatewayConfig, ParametersMode};
pub use engine::{FmiEngine, SimulationEngine, SimulationRequest};
pub use envelope::Envelope;
pub use error::ApiError;
pub use routes::{router, AppState};

pub async fn entrypoint() -> anyhow::Result<()> {
    entrypoint_from(std::env::args_os()).await
}

pub async fn entrypoint_from<I, T>(args: I) -> anyhow::Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    flexi_logger::Logger::try_with_env_or_str("info")?
        .set_palette("b1;3;2;4;6".to_string())
        .start()?;

    let config = GatewayConfig::parse_from(args);
    serve(config, FmiEngine).await
}

/// Serve the gateway until Ctrl-C is received.
pub async fn serve(
    config: GatewayConfig,
    engine: impl SimulationEngine + 'static,
) -> anyhow::Result<()> {
    let work_dir = config.work_dir();
    std::fs::create_dir_all(&work_dir)
        .with_context(|| format!("Creating work directory {}", work_dir.display()))?;

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Binding {}", config.bind))?;
    log::info!(
        "Listening on http://{} (uploads in {})",
        listener.local_addr()?,
        work_dir.display()
    );

    let app = router(AppState::new(config, engine));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => log::info!("Received Ctrl-C, shutting down"),
        Err(err) => {
            log::error!("Unable to listen for the shutdown signal: {err}");
            std::future::pending::<()>().await;
        }
    }
}
