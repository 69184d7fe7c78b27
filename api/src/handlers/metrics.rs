//! Metric handlers
//!
//! Endpoints for recording and reading job metrics.

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ensure_same_job;
use super::extract::{ApiJson, ApiPath};
use crate::domain::entities::{JobId, Metric, MetricSummary};
use crate::error::AppError;
use crate::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for logging a metric
#[derive(Debug, Deserialize)]
pub struct LogMetricRequest {
    pub job_id: Option<Uuid>,
    pub metric_name: String,
    pub value: f64,
    pub step: Option<i64>,
}

/// Metric response
#[derive(Debug, Serialize)]
pub struct MetricResponse {
    pub id: String,
    pub job_id: String,
    pub metric_name: String,
    pub value: f64,
    pub step: Option<i64>,
    pub timestamp: String,
}

impl From<Metric> for MetricResponse {
    fn from(m: Metric) -> Self {
        MetricResponse {
            id: m.id.to_string(),
            job_id: m.job_id.to_string(),
            metric_name: m.metric_name,
            value: m.value,
            step: m.step,
            timestamp: m.timestamp.to_rfc3339(),
        }
    }
}

/// Aggregates for every metric of a job
#[derive(Debug, Serialize)]
pub struct MetricSummaryResponse {
    pub job_id: String,
    pub metrics: Vec<MetricSummary>,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /training-jobs/:job_id/metrics
pub async fn log_metric(
    State(state): State<AppState>,
    ApiPath(job_id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<LogMetricRequest>,
) -> Result<(StatusCode, Json<MetricResponse>), AppError> {
    ensure_same_job(job_id, request.job_id)?;

    let metric = state
        .metrics
        .log_metric(&JobId::from(job_id), &request.metric_name, request.value, request.step)
        .await?;

    Ok((StatusCode::CREATED, Json(metric.into())))
}

/// GET /metrics/:job_id
pub async fn list_metrics(
    State(state): State<AppState>,
    ApiPath(job_id): ApiPath<Uuid>,
) -> Result<Json<Vec<MetricResponse>>, AppError> {
    let metrics = state.metrics.list_metrics(&JobId::from(job_id)).await?;
    Ok(Json(metrics.into_iter().map(Into::into).collect()))
}

/// GET /metrics/:job_id/summary
pub async fn metric_summary(
    State(state): State<AppState>,
    ApiPath(job_id): ApiPath<Uuid>,
) -> Result<Json<MetricSummaryResponse>, AppError> {
    let metrics = state.metrics.summarize(&JobId::from(job_id)).await?;
    Ok(Json(MetricSummaryResponse {
        job_id: job_id.to_string(),
        metrics,
    }))
}
