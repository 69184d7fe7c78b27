//! NeuraOrchestra API Server
//!
//! Model registry and training job orchestration with optional MLflow
//! experiment tracking. Uses hexagonal (ports & adapters) architecture.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod auth;
mod config;
mod domain;
mod entity;
mod error;
mod handlers;

#[cfg(test)]
mod test_utils;


use adapters::{
    SqliteHyperparameterRepository, SqliteMetricRepository, SqliteModelVersionRepository,
    SqliteTrainingJobRepository, TrackerBackend,
};
use app::{MetricsService, ModelRegistryService, TrainingService};
use config::{Config, LogFormat};

pub type ModelRegistry = ModelRegistryService<SqliteModelVersionRepository>;
pub type Training =
    TrainingService<SqliteTrainingJobRepository, SqliteHyperparameterRepository, TrackerBackend>;
pub type Metrics =
    MetricsService<SqliteTrainingJobRepository, SqliteMetricRepository, TrackerBackend>;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub model_registry: Arc<ModelRegistry>,
    pub training: Arc<Training>,
    pub metrics: Arc<Metrics>,
    /// SHA-256 of the configured API key
    pub api_key_hash: Option<String>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, tracker: TrackerBackend, api_key: Option<&str>) -> Self {
        let version_repo = Arc::new(SqliteModelVersionRepository::new(db.clone()));
        let job_repo = Arc::new(SqliteTrainingJobRepository::new(db.clone()));
        let metric_repo = Arc::new(SqliteMetricRepository::new(db.clone()));
        let param_repo = Arc::new(SqliteHyperparameterRepository::new(db));
        let tracker = Arc::new(tracker);

        Self {
            model_registry: Arc::new(ModelRegistryService::new(version_repo)),
            training: Arc::new(TrainingService::new(
                job_repo.clone(),
                param_repo,
                tracker.clone(),
            )),
            metrics: Arc::new(MetricsService::new(job_repo, metric_repo, tracker)),
            api_key_hash: api_key.map(auth::api_key::hash_api_key),
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        // Model registry
        .route("/models", post(handlers::register_model_version))
        .route("/models/:model_name", get(handlers::list_model_versions))
        .route(
            "/models/:model_name/latest",
            get(handlers::get_latest_model_version),
        )
        // Training jobs
        .route(
            "/training-jobs",
            get(handlers::list_training_jobs).post(handlers::create_training_job),
        )
        .route(
            "/training-jobs/:job_id",
            get(handlers::get_training_job).patch(handlers::update_training_job),
        )
        .route(
            "/training-jobs/:job_id/metrics",
            post(handlers::log_metric),
        )
        .route(
            "/training-jobs/:job_id/hyperparameters",
            post(handlers::log_hyperparameter),
        )
        // Job observations
        .route("/metrics/:job_id", get(handlers::list_metrics))
        .route("/metrics/:job_id/summary", get(handlers::metric_summary))
        .route(
            "/hyperparameters/:job_id",
            get(handlers::list_hyperparameters),
        )
        // Experiment tracker
        .route("/mlflow/runs", get(handlers::list_runs))
        // Middleware
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_api_key,
        ))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,neura_orchestra_api=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();
    init_tracing(config.log_format);

    tracing::info!("Starting NeuraOrchestra API...");

    tracing::info!("Connecting to database...");
    let db = adapters::sqlite::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database ready");

    let tracker =
        TrackerBackend::from_config(&config).context("Failed to build MLflow client")?;
    if config.api_key.is_none() {
        tracing::warn!("API_KEY not set; mutating routes are unauthenticated");
    }

    let state = AppState::new(db, tracker, config.api_key.as_deref());
    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", config.host, config.port))?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}
