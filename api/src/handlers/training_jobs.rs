//! Training job handlers
//!
//! Endpoints for creating, listing and driving training jobs.

use std::collections::BTreeMap;

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ensure_same_job;
use super::extract::{ApiJson, ApiPath, ApiQuery};
use crate::app::training_service::DEFAULT_PAGE_SIZE;
use crate::domain::entities::{JobFilter, JobId, JobStatus, TrainingJob};
use crate::error::AppError;
use crate::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating a training job
#[derive(Debug, Deserialize)]
pub struct CreateTrainingJobRequest {
    pub model_name: String,
    #[serde(default)]
    pub hyperparameters: BTreeMap<String, f64>,
    #[serde(default)]
    pub config: serde_json::Value,
}

/// Query parameters for listing jobs
#[derive(Debug, Deserialize)]
pub struct ListJobsQuery {
    pub status: Option<String>,
    pub model_name: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

fn default_limit() -> u64 {
    DEFAULT_PAGE_SIZE
}

/// Request body for a status update
#[derive(Debug, Deserialize)]
pub struct UpdateJobStatusRequest {
    /// Optional; must match the path when present
    pub job_id: Option<Uuid>,
    pub status: String,
}

/// Training job response
#[derive(Debug, Serialize)]
pub struct TrainingJobResponse {
    pub job_id: String,
    pub model_name: String,
    pub status: String,
    pub config: serde_json::Value,
    pub tracking_run_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<TrainingJob> for TrainingJobResponse {
    fn from(job: TrainingJob) -> Self {
        TrainingJobResponse {
            job_id: job.id.to_string(),
            model_name: job.model_name,
            status: job.status.to_string(),
            config: job.config,
            tracking_run_id: job.tracking_run_id,
            created_at: job.created_at.to_rfc3339(),
            updated_at: job.updated_at.to_rfc3339(),
        }
    }
}

fn parse_status(raw: &str) -> Result<JobStatus, AppError> {
    raw.parse().map_err(AppError::BadRequest)
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /training-jobs
///
/// Create a training job. Hyperparameters are stored with the job and,
/// like the config, mirrored to the experiment tracker.
pub async fn create_training_job(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateTrainingJobRequest>,
) -> Result<(StatusCode, Json<TrainingJobResponse>), AppError> {
    let job = state
        .training
        .create_job(&request.model_name, request.hyperparameters, request.config)
        .await?;

    Ok((StatusCode::CREATED, Json(job.into())))
}

/// GET /training-jobs
///
/// List jobs, newest first, optionally filtered by status and model.
pub async fn list_training_jobs(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListJobsQuery>,
) -> Result<Json<Vec<TrainingJobResponse>>, AppError> {
    let filter = JobFilter {
        status: query.status.as_deref().map(parse_status).transpose()?,
        model_name: query.model_name,
    };

    let jobs = state
        .training
        .list_jobs(&filter, query.limit, query.offset)
        .await?;

    Ok(Json(jobs.into_iter().map(Into::into).collect()))
}

/// GET /training-jobs/:job_id
pub async fn get_training_job(
    State(state): State<AppState>,
    ApiPath(job_id): ApiPath<Uuid>,
) -> Result<Json<TrainingJobResponse>, AppError> {
    let job = state
        .training
        .get_job(&JobId::from(job_id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Training job {} not found", job_id)))?;

    Ok(Json(job.into()))
}

/// PATCH /training-jobs/:job_id
///
/// Move a job to a new status. Invalid transitions return 409.
pub async fn update_training_job(
    State(state): State<AppState>,
    ApiPath(job_id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<UpdateJobStatusRequest>,
) -> Result<Json<TrainingJobResponse>, AppError> {
    ensure_same_job(job_id, request.job_id)?;
    let status = parse_status(&request.status)?;

    let job = state
        .training
        .update_status(&JobId::from(job_id), status)
        .await?;

    Ok(Json(job.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_job;

    #[test]
    fn parse_create_request_defaults() {
        let json = r#"{"model_name": "bert"}"#;
        let request: CreateTrainingJobRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.model_name, "bert");
        assert!(request.hyperparameters.is_empty());
        assert!(request.config.is_null());
    }

    #[test]
    fn parse_create_request_full() {
        let json = r#"{
            "model_name": "bert",
            "hyperparameters": {"lr": 0.0001, "batch_size": 16},
            "config": {"framework": "pytorch"}
        }"#;
        let request: CreateTrainingJobRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.hyperparameters["batch_size"], 16.0);
        assert_eq!(request.config["framework"], "pytorch");
    }

    #[test]
    fn parse_create_request_rejects_string_hyperparameter() {
        let json = r#"{"model_name": "bert", "hyperparameters": {"lr": "fast"}}"#;
        let result: Result<CreateTrainingJobRequest, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn parse_list_query_defaults() {
        let query: ListJobsQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.limit, 20);
        assert_eq!(query.offset, 0);
        assert!(query.status.is_none());
    }

    #[test]
    fn parse_status_values() {
        assert_eq!(parse_status("running").unwrap(), JobStatus::Running);
        assert!(matches!(
            parse_status("exploded"),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn serialize_job_response() {
        let response: TrainingJobResponse = test_job("resnet", JobStatus::Pending).into();

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"status\":\"pending\""));
        assert!(json.contains("\"job_id\""));
        assert!(json.contains("\"epochs\":10"));
    }
}
