//! MLflow tracking client implementation

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::domain::entities::{JobStatus, Metric};
use crate::domain::ports::{ExperimentTracker, TrackedRun};
use crate::error::TrackingError;

/// MLflow caps params per `log-batch` request at 100
const MAX_PARAMS_PER_BATCH: usize = 100;

/// Implementation of the experiment tracker against an MLflow server
pub struct MlflowTracker {
    http: Client,
    base_url: String,
    experiment_id: String,
}

impl MlflowTracker {
    /// Every request to the server is bounded by `timeout`.
    pub fn new(
        base_url: String,
        experiment_id: String,
        timeout: Duration,
    ) -> Result<Self, TrackingError> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            experiment_id,
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api/2.0/mlflow{}", self.base_url, path)
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<reqwest::Response, TrackingError> {
        let response = self.http.post(self.api_url(path)).json(body).send().await?;
        let status = response.status();

        if status.is_success() {
            Ok(response)
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(TrackingError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, TrackingError>
    where
        B: Serialize + ?Sized,
        T: for<'de> Deserialize<'de>,
    {
        self.post(path, body)
            .await?
            .json()
            .await
            .map_err(|e| TrackingError::Deserialization(e.to_string()))
    }
}

/// MLflow run status for a job status
pub fn run_status(status: JobStatus) -> &'static str {
    match status {
        JobStatus::Pending => "SCHEDULED",
        JobStatus::Running => "RUNNING",
        JobStatus::Completed => "FINISHED",
        JobStatus::Failed => "FAILED",
        JobStatus::Cancelled => "KILLED",
    }
}

/// Request types for MLflow API
#[derive(Serialize)]
struct CreateRunRequest<'a> {
    experiment_id: &'a str,
    run_name: &'a str,
    start_time: i64,
}

#[derive(Serialize)]
struct KeyValue<'a> {
    key: &'a str,
    value: &'a str,
}

#[derive(Serialize)]
struct LogBatchRequest<'a> {
    run_id: &'a str,
    params: &'a [KeyValue<'a>],
}

#[derive(Serialize)]
struct LogMetricRequest<'a> {
    run_id: &'a str,
    key: &'a str,
    value: f64,
    timestamp: i64,
    step: i64,
}

#[derive(Serialize)]
struct UpdateRunRequest<'a> {
    run_id: &'a str,
    status: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    end_time: Option<i64>,
}

#[derive(Serialize)]
struct SearchRunsRequest<'a> {
    experiment_ids: Vec<&'a str>,
    max_results: u32,
    order_by: Vec<&'a str>,
}

/// Response types from MLflow API
#[derive(Deserialize)]
struct CreateRunResponse {
    run: RunResponse,
}

#[derive(Deserialize, Default)]
struct SearchRunsResponse {
    #[serde(default)]
    runs: Vec<RunResponse>,
}

#[derive(Deserialize)]
struct RunResponse {
    info: RunInfoResponse,
    #[serde(default)]
    data: RunDataResponse,
}

#[derive(Deserialize)]
struct RunInfoResponse {
    run_id: String,
    run_name: Option<String>,
    #[serde(default)]
    status: String,
    start_time: Option<i64>,
    end_time: Option<i64>,
}

#[derive(Deserialize, Default)]
struct RunDataResponse {
    #[serde(default)]
    metrics: Vec<MetricResponse>,
    #[serde(default)]
    params: Vec<ParamResponse>,
}

#[derive(Deserialize)]
struct MetricResponse {
    key: String,
    value: f64,
}

#[derive(Deserialize)]
struct ParamResponse {
    key: String,
    value: String,
}

fn from_millis(ms: Option<i64>) -> Option<DateTime<Utc>> {
    ms.and_then(DateTime::from_timestamp_millis)
}

impl From<RunResponse> for TrackedRun {
    fn from(r: RunResponse) -> Self {
        TrackedRun {
            run_id: r.info.run_id,
            run_name: r.info.run_name,
            status: r.info.status,
            start_time: from_millis(r.info.start_time),
            end_time: from_millis(r.info.end_time),
            params: r
                .data
                .params
                .into_iter()
                .map(|p| (p.key, p.value))
                .collect(),
            metrics: r
                .data
                .metrics
                .into_iter()
                .map(|m| (m.key, m.value))
                .collect(),
        }
    }
}

#[async_trait]
impl ExperimentTracker for MlflowTracker {
    async fn start_run(&self, run_name: &str) -> Result<Option<String>, TrackingError> {
        let response: CreateRunResponse = self
            .post_json(
                "/runs/create",
                &CreateRunRequest {
                    experiment_id: &self.experiment_id,
                    run_name,
                    start_time: Utc::now().timestamp_millis(),
                },
            )
            .await?;

        Ok(Some(response.run.info.run_id))
    }

    async fn log_params(
        &self,
        run_id: &str,
        params: &BTreeMap<String, String>,
    ) -> Result<(), TrackingError> {
        let entries: Vec<KeyValue<'_>> = params
            .iter()
            .map(|(key, value)| KeyValue { key, value })
            .collect();

        for chunk in entries.chunks(MAX_PARAMS_PER_BATCH) {
            self.post(
                "/runs/log-batch",
                &LogBatchRequest {
                    run_id,
                    params: chunk,
                },
            )
            .await?;
        }

        Ok(())
    }

    async fn log_metric(&self, run_id: &str, metric: &Metric) -> Result<(), TrackingError> {
        self.post(
            "/runs/log-metric",
            &LogMetricRequest {
                run_id,
                key: &metric.metric_name,
                value: metric.value,
                timestamp: metric.timestamp.timestamp_millis(),
                step: metric.step.unwrap_or(0),
            },
        )
        .await?;
        Ok(())
    }

    async fn update_run_status(
        &self,
        run_id: &str,
        status: JobStatus,
    ) -> Result<(), TrackingError> {
        let end_time = status
            .is_terminal()
            .then(|| Utc::now().timestamp_millis());

        self.post(
            "/runs/update",
            &UpdateRunRequest {
                run_id,
                status: run_status(status),
                end_time,
            },
        )
        .await?;
        Ok(())
    }

    async fn search_runs(&self, max_results: u32) -> Result<Vec<TrackedRun>, TrackingError> {
        let response: SearchRunsResponse = self
            .post_json(
                "/runs/search",
                &SearchRunsRequest {
                    experiment_ids: vec![self.experiment_id.as_str()],
                    max_results,
                    order_by: vec!["attributes.start_time DESC"],
                },
            )
            .await?;

        Ok(response.runs.into_iter().map(TrackedRun::from).collect())
    }
}

/// A no-op tracker for when no MLflow server is configured
pub struct NoopTracker;

#[async_trait]
impl ExperimentTracker for NoopTracker {
    async fn start_run(&self, _run_name: &str) -> Result<Option<String>, TrackingError> {
        Ok(None)
    }

    async fn log_params(
        &self,
        _run_id: &str,
        _params: &BTreeMap<String, String>,
    ) -> Result<(), TrackingError> {
        Ok(())
    }

    async fn log_metric(&self, _run_id: &str, _metric: &Metric) -> Result<(), TrackingError> {
        Ok(())
    }

    async fn update_run_status(
        &self,
        _run_id: &str,
        _status: JobStatus,
    ) -> Result<(), TrackingError> {
        Ok(())
    }

    async fn search_runs(&self, _max_results: u32) -> Result<Vec<TrackedRun>, TrackingError> {
        Ok(Vec::new())
    }
}

/// Tracker selected from configuration at startup
pub enum TrackerBackend {
    Mlflow(MlflowTracker),
    Noop(NoopTracker),
}

impl TrackerBackend {
    pub fn from_config(config: &Config) -> Result<Self, TrackingError> {
        match &config.mlflow_tracking_uri {
            Some(uri) => {
                tracing::info!(
                    uri = %uri,
                    experiment = %config.mlflow_experiment_id,
                    timeout_secs = config.mlflow_timeout.as_secs(),
                    "MLflow tracking enabled"
                );
                Ok(TrackerBackend::Mlflow(MlflowTracker::new(
                    uri.clone(),
                    config.mlflow_experiment_id.clone(),
                    config.mlflow_timeout,
                )?))
            }
            None => {
                tracing::info!("MLflow tracking disabled (MLFLOW_TRACKING_URI not set)");
                Ok(TrackerBackend::Noop(NoopTracker))
            }
        }
    }

    fn inner(&self) -> &dyn ExperimentTracker {
        match self {
            TrackerBackend::Mlflow(t) => t,
            TrackerBackend::Noop(t) => t,
        }
    }
}

#[async_trait]
impl ExperimentTracker for TrackerBackend {
    async fn start_run(&self, run_name: &str) -> Result<Option<String>, TrackingError> {
        self.inner().start_run(run_name).await
    }

    async fn log_params(
        &self,
        run_id: &str,
        params: &BTreeMap<String, String>,
    ) -> Result<(), TrackingError> {
        self.inner().log_params(run_id, params).await
    }

    async fn log_metric(&self, run_id: &str, metric: &Metric) -> Result<(), TrackingError> {
        self.inner().log_metric(run_id, metric).await
    }

    async fn update_run_status(
        &self,
        run_id: &str,
        status: JobStatus,
    ) -> Result<(), TrackingError> {
        self.inner().update_run_status(run_id, status).await
    }

    async fn search_runs(&self, max_results: u32) -> Result<Vec<TrackedRun>, TrackingError> {
        self.inner().search_runs(max_results).await
    }
}
