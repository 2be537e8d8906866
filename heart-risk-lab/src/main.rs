//! Heart Risk Lab - Heart Risk Calculator Service
//!
//! # Service Topology
//!
//! - `/` - Heart Risk Calculator form
//! - `/predict` - Risk classification endpoint
//! - `/health` - Liveness probe
//! - `/ready` - Readiness probe
//! - `/api/v1/model` - Loaded model metadata
//!
//! The model is loaded (or trained on synthetic data and saved) once before
//! the listener binds. Requests never touch the model file.

use anyhow::{Context as _, Result};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;

use config::{Config, LogFormat};
use heart_risk_agents::{
    model::load_or_train, PredictError, PredictHandler, RiskAgent, RiskInput, SavedModel,
    TelemetryEmitter, INDEX_HTML, RISK_AGENT_ID, RISK_AGENT_VERSION,
};

/// Application state shared by every request.
///
/// Holds the model loaded at startup. Nothing in here is mutated after
/// construction.
#[derive(Clone)]
pub struct AppState {
    /// Predict handler wrapping the risk agent
    predict_handler: Arc<PredictHandler>,
    /// Model file contents, for the info route
    saved_model: Arc<SavedModel>,
    /// Service configuration
    config: Arc<Config>,
}

impl AppState {
    /// Wire the handler around an already-loaded model.
    pub fn new(config: Config, saved_model: SavedModel) -> Result<Self> {
        let agent = RiskAgent::from_saved(&saved_model)
            .context("Saved model cannot be used for prediction")?;
        let telemetry =
            TelemetryEmitter::with_config(RISK_AGENT_ID, RISK_AGENT_VERSION, config.telemetry_stdout);

        Ok(Self {
            predict_handler: Arc::new(PredictHandler::with_telemetry(agent, telemetry)),
            saved_model: Arc::new(saved_model),
            config: Arc::new(config),
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    init_tracing(&config)?;

    info!(
        service = %config.service_name,
        version = %config.service_version,
        platform_env = config.platform_env_name(),
        model_path = %config.model_path.display(),
        "Starting Heart Risk Lab service"
    );

    // Training and file I/O are blocking
    let model_path = config.model_path.clone();
    let training = config.training.clone();
    let saved_model = tokio::task::spawn_blocking(move || load_or_train(&model_path, &training))
        .await
        .context("Model bootstrap task panicked")?
        .with_context(|| format!("Failed to load model from {}", config.model_path.display()))?;

    let addr = config.bind_addr();
    let state = AppState::new(config, saved_model)?;
    info!(model_id = %state.saved_model.model_id, "Application state initialized");

    let app = build_router(state);

    info!(address = %addr, "Server listening");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(config: &Config) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(config.default_log_filter()))
        .context("Invalid log filter")?;

    let json = config.log_format == LogFormat::Json;
    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(())
}

/// Build the service router.
fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/predict", post(predict))
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/api/v1/model", get(model_info))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// Form and Prediction
// =============================================================================

/// GET / - The calculator page.
async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// POST /predict - Classify the submitted indicators.
async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<RiskInput>, JsonRejection>,
) -> Response {
    let input = match payload {
        Ok(Json(input)) => input,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "Rejected prediction request body");
            let err = PredictError::invalid_input(rejection.body_text());
            return (rejection.status(), Json(err.to_body())).into_response();
        }
    };

    match state.predict_handler.handle(input).await {
        Ok(output) => (StatusCode::OK, Json(output.assessment)).into_response(),
        Err(err) => {
            let status = if err.is_client_error() {
                StatusCode::BAD_REQUEST
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            (status, Json(err.to_body())).into_response()
        }
    }
}

// =============================================================================
// Health Endpoints
// =============================================================================

/// Liveness probe - always returns OK if the process is running.
async fn health_check() -> &'static str {
    "OK"
}

/// Readiness probe - the model is loaded before the listener binds, so this
/// only fails if the loaded file no longer checks out.
async fn readiness_check(State(state): State<AppState>) -> (StatusCode, &'static str) {
    if state.saved_model.check_compatible().is_ok() {
        (StatusCode::OK, "READY")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "NOT_READY")
    }
}

// =============================================================================
// Model Info
// =============================================================================

/// GET /api/v1/model - Metadata and weights of the loaded model.
async fn model_info(State(state): State<AppState>) -> Json<ModelInfoResponse> {
    Json(ModelInfoResponse {
        agent_id: RISK_AGENT_ID.to_string(),
        agent_version: RISK_AGENT_VERSION.to_string(),
        service_name: state.config.service_name.clone(),
        service_version: state.config.service_version.clone(),
        model: state.saved_model.as_ref().clone(),
    })
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ModelInfoResponse {
    pub agent_id: String,
    pub agent_version: String,
    pub service_name: String,
    pub service_version: String,
    pub model: SavedModel,
}
