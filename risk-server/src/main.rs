//! EduMind Risk Server
//!
//! HTTP front end for the student risk engine.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    EDUMIND RISK SERVER                      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐   ┌──────────────┐   ┌────────────────────┐  │
//! │  │  API      │──▶│  RiskEngine  │──▶│  RiskModel         │  │
//! │  │  (Axum)   │   │  (shared)    │   │  (builtin / file / │  │
//! │  └───────────┘   └──────────────┘   │   remote)          │  │
//! │                                     └────────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The model is loaded once on a blocking task at startup. Until it is ready
//! `/health` and the prediction routes answer 503.

mod config;
mod error;
mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use parking_lot::RwLock;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use edumind_risk_core::{load_model, AdvisoryCatalog, RiskEngine};

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    // Initialize logging
    init_tracing(config.json_logs);

    tracing::info!("EduMind Risk Server starting...");
    tracing::info!("Environment: {}", config.environment);
    tracing::info!("Model source: {}", config.model_source.describe());

    // Build application state; the engine loads in the background
    let state = AppState::new(config.clone());
    spawn_engine_loader(state.clone());

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "edumind_risk_server=debug,edumind_risk_core=info,tower_http=debug".into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

/// Client-facing reason for a failed load; the cause is only logged
pub const LOAD_FAILURE_REASON: &str = "model failed to load; see server logs";

/// Lifecycle of the shared engine
#[derive(Clone)]
pub enum EngineSlot {
    Loading,
    Ready(Arc<RiskEngine>),
    Failed,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RwLock<EngineSlot>>,
    pub config: config::Config,
}

impl AppState {
    pub fn new(config: config::Config) -> Self {
        Self {
            engine: Arc::new(RwLock::new(EngineSlot::Loading)),
            config,
        }
    }

    /// The lock is held only long enough to clone the handle
    pub fn ready_engine(&self) -> AppResult<Arc<RiskEngine>> {
        match &*self.engine.read() {
            EngineSlot::Ready(engine) => Ok(Arc::clone(engine)),
            EngineSlot::Loading => Err(AppError::NotReady("model is still loading".to_string())),
            EngineSlot::Failed => Err(AppError::NotReady(LOAD_FAILURE_REASON.to_string())),
        }
    }
}

/// Load model and catalog off the async runtime, then publish the engine
fn spawn_engine_loader(state: AppState) {
    tokio::spawn(async move {
        let config = state.config.clone();
        let loaded = tokio::task::spawn_blocking(move || build_engine(&config)).await;

        let slot = match loaded {
            Ok(Ok(engine)) => {
                tracing::info!(
                    "Model '{}' v{} ready",
                    engine.model_metadata().name,
                    engine.model_metadata().version
                );
                EngineSlot::Ready(Arc::new(engine))
            }
            Ok(Err(e)) => {
                tracing::error!("Model load failed: {:#}", e);
                EngineSlot::Failed
            }
            Err(e) => {
                tracing::error!("Model loader task failed: {}", e);
                EngineSlot::Failed
            }
        };

        *state.engine.write() = slot;
    });
}

fn build_engine(config: &config::Config) -> anyhow::Result<RiskEngine> {
    let model = load_model(&config.model_source).context("failed to load risk model")?;

    let catalog = match &config.catalog_path {
        Some(path) => AdvisoryCatalog::load(path)
            .with_context(|| format!("failed to load advisory catalog {}", path.display()))?,
        None => AdvisoryCatalog::builtin().clone(),
    };

    Ok(RiskEngine::new(model, Arc::new(catalog)))
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/api/v1/predict", post(handlers::predict::predict))
        .route("/api/v1/model", get(handlers::model::info));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([handlers::predict::REQUEST_ID_HEADER.clone()]);

    Router::new()
        .route("/health", get(handlers::health::check))
        .merge(api_routes)
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
