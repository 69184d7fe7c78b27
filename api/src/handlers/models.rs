//! Model registry handlers
//!
//! Endpoints for registering and browsing model versions.

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use super::extract::{ApiJson, ApiPath};
use crate::domain::entities::{ModelVersion, NewModelVersion};
use crate::error::AppError;
use crate::AppState;

/// Request body for registering a model version
#[derive(Debug, Deserialize)]
pub struct CreateModelVersionRequest {
    pub model_name: String,
    pub version: String,
    pub description: Option<String>,
}

/// Model version response
#[derive(Debug, Serialize)]
pub struct ModelVersionResponse {
    pub id: String,
    pub model_name: String,
    pub version: String,
    pub description: Option<String>,
    pub created_at: String,
}

impl From<ModelVersion> for ModelVersionResponse {
    fn from(v: ModelVersion) -> Self {
        ModelVersionResponse {
            id: v.id.to_string(),
            model_name: v.model_name,
            version: v.version,
            description: v.description,
            created_at: v.created_at.to_rfc3339(),
        }
    }
}

/// POST /models
///
/// Register a new version of a model.
pub async fn register_model_version(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateModelVersionRequest>,
) -> Result<(StatusCode, Json<ModelVersionResponse>), AppError> {
    let version = state
        .model_registry
        .register(NewModelVersion {
            model_name: request.model_name,
            version: request.version,
            description: request.description,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(version.into())))
}

/// GET /models/:model_name
///
/// List all versions of a model, newest first.
pub async fn list_model_versions(
    State(state): State<AppState>,
    ApiPath(model_name): ApiPath<String>,
) -> Result<Json<Vec<ModelVersionResponse>>, AppError> {
    let versions = state.model_registry.list_versions(&model_name).await?;
    Ok(Json(versions.into_iter().map(Into::into).collect()))
}

/// GET /models/:model_name/latest
///
/// Get the most recently registered version of a model.
pub async fn get_latest_model_version(
    State(state): State<AppState>,
    ApiPath(model_name): ApiPath<String>,
) -> Result<Json<ModelVersionResponse>, AppError> {
    let version = state
        .model_registry
        .latest_version(&model_name)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No versions registered for '{}'", model_name)))?;

    Ok(Json(version.into()))
}
