//! Experiment tracker port trait
//!
//! Defines the interface for mirroring training jobs into an external
//! experiment tracking system (MLflow).

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{JobStatus, Metric};
use crate::error::TrackingError;

/// A run as reported by the tracking server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedRun {
    pub run_id: String,
    pub run_name: Option<String>,
    pub status: String,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub params: BTreeMap<String, String>,
    /// Latest value per metric key
    #[serde(default)]
    pub metrics: BTreeMap<String, f64>,
}

/// Port trait for experiment tracking
#[async_trait]
pub trait ExperimentTracker: Send + Sync {
    /// Start a run. Returns `None` when tracking is disabled.
    async fn start_run(&self, run_name: &str) -> Result<Option<String>, TrackingError>;

    /// Log string parameters on a run
    async fn log_params(
        &self,
        run_id: &str,
        params: &BTreeMap<String, String>,
    ) -> Result<(), TrackingError>;

    /// Log a metric observation on a run
    async fn log_metric(&self, run_id: &str, metric: &Metric) -> Result<(), TrackingError>;

    /// Reflect a job status change on its run
    async fn update_run_status(&self, run_id: &str, status: JobStatus)
        -> Result<(), TrackingError>;

    /// List the most recent runs of the configured experiment
    async fn search_runs(&self, max_results: u32) -> Result<Vec<TrackedRun>, TrackingError>;
}
