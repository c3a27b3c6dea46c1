use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::{
        multipart::{Multipart, MultipartRejection},
        DefaultBodyLimit, State,
    },
    routing::post,
    Json, Router,
};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer};

use crate::{
    config::GatewayConfig,
    engine::{SimulationEngine, SimulationRequest},
    envelope::Envelope,
    error::ApiError,
    params::Overrides,
    workspace::UploadWorkspace,
};

pub const SIMULATE_PATH: &str = "/api/simulate";
pub const FILE_FIELD: &str = "fmuFile";
pub const PARAMETERS_FIELD: &str = "parameters";

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    pub engine: Arc<dyn SimulationEngine>,
}

impl AppState {
    pub fn new(config: GatewayConfig, engine: impl SimulationEngine + 'static) -> Self {
        Self {
            config: Arc::new(config),
            engine: Arc::new(engine),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let upload_limit = state.config.upload_limit();
    Router::new()
        .route(SIMULATE_PATH, post(simulate))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(upload_limit))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn simulate(
    State(state): State<AppState>,
    form: Result<Multipart, MultipartRejection>,
) -> Result<Json<Envelope>, ApiError> {
    let mut form = form?;
    let config = &state.config;

    // Dropping the workspace on any early return removes the upload
    let workspace = UploadWorkspace::new(&config.work_dir())?;

    let mut package = None;
    let mut parameters = None;
    while let Some(field) = form.next_field().await? {
        let name = field.name().unwrap_or_default().to_owned();
        match name.as_str() {
            FILE_FIELD if package.is_none() => package = Some(workspace.receive(field).await?),
            PARAMETERS_FIELD => parameters = Some(field.text().await?),
            _ => log::debug!("Ignoring form field '{name}'"),
        }
    }
    let package = package.ok_or(ApiError::MissingFile)?;

    let overrides = Overrides::parse(parameters.as_deref(), config.parameters_mode)?;

    let timeout = config.timeout();
    let request = SimulationRequest {
        package,
        extract_parent: workspace.path().to_owned(),
        stop_time: config.stop_time,
        output_interval: config.output_interval,
        outputs: config.output_selection(),
        start_values: overrides.start_values(config),
        deadline: config.deadline(),
    };

    let engine = Arc::clone(&state.engine);
    let task = tokio::task::spawn_blocking(move || {
        let result = engine.simulate(request);
        if let Err(err) = workspace.close() {
            log::warn!("Failed to remove upload directory: {err}");
        }
        result
    });

    let batch = match tokio::time::timeout(timeout, task).await {
        Ok(joined) => joined.context("Simulation task failed")??,
        Err(_) => return Err(ApiError::Timeout(timeout)),
    };

    let envelope = Envelope::from_batch(&batch)?;
    log::info!(
        "Simulated {} samples of {:?}",
        batch.num_rows(),
        envelope.variables
    );
    Ok(Json(envelope))
}
