//! Hyperparameter handlers

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ensure_same_job;
use super::extract::{ApiJson, ApiPath};
use crate::domain::entities::{Hyperparameter, JobId};
use crate::error::AppError;
use crate::AppState;

/// Request body for logging a hyperparameter
#[derive(Debug, Deserialize)]
pub struct LogHyperparameterRequest {
    pub job_id: Option<Uuid>,
    pub param_name: String,
    pub param_value: f64,
}

#[derive(Debug, Serialize)]
pub struct HyperparameterResponse {
    pub id: String,
    pub job_id: String,
    pub param_name: String,
    pub param_value: f64,
    pub timestamp: String,
}

impl From<Hyperparameter> for HyperparameterResponse {
    fn from(p: Hyperparameter) -> Self {
        HyperparameterResponse {
            id: p.id.to_string(),
            job_id: p.job_id.to_string(),
            param_name: p.param_name,
            param_value: p.param_value,
            timestamp: p.timestamp.to_rfc3339(),
        }
    }
}

/// POST /training-jobs/:job_id/hyperparameters
pub async fn log_hyperparameter(
    State(state): State<AppState>,
    ApiPath(job_id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<LogHyperparameterRequest>,
) -> Result<(StatusCode, Json<HyperparameterResponse>), AppError> {
    ensure_same_job(job_id, request.job_id)?;

    let param = state
        .training
        .log_hyperparameter(&JobId::from(job_id), &request.param_name, request.param_value)
        .await?;

    Ok((StatusCode::CREATED, Json(param.into())))
}

/// GET /hyperparameters/:job_id
pub async fn list_hyperparameters(
    State(state): State<AppState>,
    ApiPath(job_id): ApiPath<Uuid>,
) -> Result<Json<Vec<HyperparameterResponse>>, AppError> {
    let params = state.training.list_hyperparameters(&JobId::from(job_id)).await?;
    Ok(Json(params.into_iter().map(Into::into).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_log_hyperparameter_request() {
        let json = r#"{"param_name": "learning_rate", "param_value": 0.001}"#;
        let request: LogHyperparameterRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.param_name, "learning_rate");
        assert_eq!(request.param_value, 0.001);
    }

    #[test]
    fn parse_rejects_missing_value() {
        let json = r#"{"param_name": "learning_rate"}"#;
        let result: Result<LogHyperparameterRequest, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
