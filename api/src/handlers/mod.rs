//! HTTP handlers
//!
//! Axum request handlers for the API endpoints.

pub mod extract;
pub mod hyperparameters;
pub mod metrics;
pub mod models;
pub mod tracking;
pub mod training_jobs;

pub use hyperparameters::{list_hyperparameters, log_hyperparameter};
pub use metrics::{list_metrics, log_metric, metric_summary};
pub use models::{get_latest_model_version, list_model_versions, register_model_version};
pub use tracking::list_runs;
pub use training_jobs::{
    create_training_job, get_training_job, list_training_jobs, update_training_job,
};

use uuid::Uuid;

use crate::error::AppError;

/// Reject bodies whose `job_id` disagrees with the path
pub(crate) fn ensure_same_job(path_id: Uuid, body_id: Option<Uuid>) -> Result<(), AppError> {
    match body_id {
        Some(id) if id != path_id => Err(AppError::BadRequest(format!(
            "job_id {} in body does not match path job {}",
            id, path_id
        ))),
        _ => Ok(()),
    }
}
