//! Experiment tracker handlers
//!
//! Read-only view of the runs held by the tracking server.

use axum::{
    extract::State,
    Json,
};
use serde::{Deserialize, Serialize};

use super::extract::ApiQuery;
use crate::domain::ports::TrackedRun;
use crate::error::AppError;
use crate::AppState;

const MAX_RESULTS_LIMIT: u32 = 1000;

#[derive(Debug, Deserialize)]
pub struct RunsQuery {
    #[serde(default = "default_max_results")]
    pub max_results: u32,
}

fn default_max_results() -> u32 {
    100
}

#[derive(Debug, Serialize)]
pub struct RunsResponse {
    pub runs: Vec<TrackedRun>,
}

/// GET /mlflow/runs
///
/// Empty when tracking is disabled. Tracker failures surface as 502.
pub async fn list_runs(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<RunsQuery>,
) -> Result<Json<RunsResponse>, AppError> {
    let max_results = query.max_results.clamp(1, MAX_RESULTS_LIMIT);
    let runs = state.training.tracked_runs(max_results).await?;
    Ok(Json(RunsResponse { runs }))
}
