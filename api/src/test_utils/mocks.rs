//! Mock implementations of port traits
//!
//! These are in-memory implementations that can be configured for testing.
//! They store data in memory and allow tests to verify behavior.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, RwLock};

use crate::domain::entities::{
    Hyperparameter, HyperparameterId, JobFilter, JobId, JobStatus, Metric, MetricId, ModelVersion,
    ModelVersionId, NewHyperparameter, NewMetric, NewModelVersion, NewTrainingJob, TrainingJob,
};
use crate::domain::ports::{
    ExperimentTracker, HyperparameterRepository, MetricRepository, ModelVersionRepository,
    TrackedRun, TrainingJobRepository,
};
use crate::error::{DomainError, TrackingError};

// ============================================================================
// In-Memory Model Version Repository
// ============================================================================

/// Versions are kept in registration order
#[derive(Default)]
pub struct InMemoryModelVersionRepository {
    versions: Arc<RwLock<Vec<ModelVersion>>>,
}

impl InMemoryModelVersionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with a version for testing
    pub fn with_version(self, version: ModelVersion) -> Self {
        self.versions.write().unwrap().push(version);
        self
    }
}

#[async_trait]
impl ModelVersionRepository for InMemoryModelVersionRepository {
    async fn create(&self, new_version: &NewModelVersion) -> Result<ModelVersion, DomainError> {
        let mut versions = self.versions.write().unwrap();
        if versions
            .iter()
            .any(|v| v.model_name == new_version.model_name && v.version == new_version.version)
        {
            return Err(DomainError::AlreadyExists(format!(
                "Model '{}' version '{}' already exists",
                new_version.model_name, new_version.version
            )));
        }

        let version = ModelVersion {
            id: ModelVersionId::new(),
            model_name: new_version.model_name.clone(),
            version: new_version.version.clone(),
            description: new_version.description.clone(),
            created_at: Utc::now(),
        };
        versions.push(version.clone());
        Ok(version)
    }

    async fn find(
        &self,
        model_name: &str,
        version: &str,
    ) -> Result<Option<ModelVersion>, DomainError> {
        let versions = self.versions.read().unwrap();
        Ok(versions
            .iter()
            .find(|v| v.model_name == model_name && v.version == version)
            .cloned())
    }

    async fn list_by_model(&self, model_name: &str) -> Result<Vec<ModelVersion>, DomainError> {
        let versions = self.versions.read().unwrap();
        Ok(versions
            .iter()
            .rev()
            .filter(|v| v.model_name == model_name)
            .cloned()
            .collect())
    }

    async fn find_latest(&self, model_name: &str) -> Result<Option<ModelVersion>, DomainError> {
        let versions = self.versions.read().unwrap();
        Ok(versions
            .iter()
            .rev()
            .find(|v| v.model_name == model_name)
            .cloned())
    }
}

// ============================================================================
// In-Memory Training Job Repository
// ============================================================================

/// Initial hyperparameters land in a store shared with the repository
/// returned by `hyperparameters()`
#[derive(Default)]
pub struct InMemoryTrainingJobRepository {
    jobs: Arc<RwLock<Vec<TrainingJob>>>,
    params: Arc<RwLock<Vec<Hyperparameter>>>,
}

impl InMemoryTrainingJobRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with a job for testing
    pub fn with_job(self, job: TrainingJob) -> Self {
        self.jobs.write().unwrap().push(job);
        self
    }

    /// Hyperparameter repository backed by this repository's store
    pub fn hyperparameters(&self) -> InMemoryHyperparameterRepository {
        InMemoryHyperparameterRepository {
            params: self.params.clone(),
        }
    }
}

#[async_trait]
impl TrainingJobRepository for InMemoryTrainingJobRepository {
    async fn create(&self, new_job: &NewTrainingJob) -> Result<TrainingJob, DomainError> {
        let now = Utc::now();
        let job = TrainingJob {
            id: JobId::new(),
            model_name: new_job.model_name.clone(),
            status: JobStatus::Pending,
            config: new_job.config.clone(),
            tracking_run_id: None,
            created_at: now,
            updated_at: now,
        };

        let mut params = self.params.write().unwrap();
        params.extend(new_job.hyperparameters.iter().map(|(name, value)| Hyperparameter {
            id: HyperparameterId::new(),
            job_id: job.id,
            param_name: name.clone(),
            param_value: *value,
            timestamp: now,
        }));

        self.jobs.write().unwrap().push(job.clone());
        Ok(job)
    }

    async fn find_by_id(&self, id: &JobId) -> Result<Option<TrainingJob>, DomainError> {
        let jobs = self.jobs.read().unwrap();
        Ok(jobs.iter().find(|j| j.id == *id).cloned())
    }

    async fn list(
        &self,
        filter: &JobFilter,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<TrainingJob>, DomainError> {
        let jobs = self.jobs.read().unwrap();
        Ok(jobs
            .iter()
            .rev()
            .filter(|j| filter.matches(j))
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn update_status(
        &self,
        id: &JobId,
        from: JobStatus,
        to: JobStatus,
    ) -> Result<TrainingJob, DomainError> {
        let mut jobs = self.jobs.write().unwrap();
        match jobs.iter_mut().find(|j| j.id == *id) {
            Some(job) if job.status == from => {
                job.status = to;
                job.updated_at = Utc::now();
                Ok(job.clone())
            }
            Some(job) => Err(DomainError::Conflict(format!(
                "Training job {} is {}, expected {}",
                id, job.status, from
            ))),
            None => Err(DomainError::NotFound(format!("Training job {} not found", id))),
        }
    }

    async fn set_tracking_run_id(&self, id: &JobId, run_id: &str) -> Result<(), DomainError> {
        let mut jobs = self.jobs.write().unwrap();
        if let Some(job) = jobs.iter_mut().find(|j| j.id == *id) {
            job.tracking_run_id = Some(run_id.to_string());
            Ok(())
        } else {
            Err(DomainError::NotFound(format!("Training job {} not found", id)))
        }
    }
}

// ============================================================================
// In-Memory Metric Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryMetricRepository {
    metrics: Arc<RwLock<Vec<Metric>>>,
}

impl InMemoryMetricRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MetricRepository for InMemoryMetricRepository {
    async fn create(&self, new_metric: &NewMetric) -> Result<Metric, DomainError> {
        let metric = Metric {
            id: MetricId::new(),
            job_id: new_metric.job_id,
            metric_name: new_metric.metric_name.clone(),
            value: new_metric.value,
            step: new_metric.step,
            timestamp: Utc::now(),
        };
        self.metrics.write().unwrap().push(metric.clone());
        Ok(metric)
    }

    async fn list_by_job(&self, job_id: &JobId) -> Result<Vec<Metric>, DomainError> {
        let metrics = self.metrics.read().unwrap();
        Ok(metrics
            .iter()
            .filter(|m| m.job_id == *job_id)
            .cloned()
            .collect())
    }
}

// ============================================================================
// In-Memory Hyperparameter Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryHyperparameterRepository {
    params: Arc<RwLock<Vec<Hyperparameter>>>,
}

impl InMemoryHyperparameterRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HyperparameterRepository for InMemoryHyperparameterRepository {
    async fn create(&self, new_param: &NewHyperparameter) -> Result<Hyperparameter, DomainError> {
        let param = Hyperparameter {
            id: HyperparameterId::new(),
            job_id: new_param.job_id,
            param_name: new_param.param_name.clone(),
            param_value: new_param.param_value,
            timestamp: Utc::now(),
        };
        self.params.write().unwrap().push(param.clone());
        Ok(param)
    }

    async fn list_by_job(&self, job_id: &JobId) -> Result<Vec<Hyperparameter>, DomainError> {
        let params = self.params.read().unwrap();
        Ok(params
            .iter()
            .filter(|p| p.job_id == *job_id)
            .cloned()
            .collect())
    }
}

// ============================================================================
// Recording Experiment Tracker
// ============================================================================

/// A call observed by the recording tracker
#[derive(Debug, Clone, PartialEq)]
pub enum TrackerCall {
    StartRun(String),
    LogParams(String, BTreeMap<String, String>),
    LogMetric(String, String, f64),
    UpdateStatus(String, JobStatus),
    SearchRuns(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TrackerMode {
    Enabled,
    Disabled,
    Failing,
}

/// Tracker that records every call.
///
/// `failing()` returns an API error from every method after recording the
/// call; `disabled()` behaves like the no-op tracker.
pub struct RecordingTracker {
    mode: TrackerMode,
    calls: Mutex<Vec<TrackerCall>>,
    runs: Vec<TrackedRun>,
}

impl RecordingTracker {
    pub fn new() -> Self {
        Self::with_mode(TrackerMode::Enabled)
    }

    pub fn disabled() -> Self {
        Self::with_mode(TrackerMode::Disabled)
    }

    pub fn failing() -> Self {
        Self::with_mode(TrackerMode::Failing)
    }

    fn with_mode(mode: TrackerMode) -> Self {
        Self {
            mode,
            calls: Mutex::new(Vec::new()),
            runs: Vec::new(),
        }
    }

    /// Runs returned from `search_runs`
    pub fn with_runs(mut self, runs: Vec<TrackedRun>) -> Self {
        self.runs = runs;
        self
    }

    pub fn calls(&self) -> Vec<TrackerCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: TrackerCall) -> Result<(), TrackingError> {
        self.calls.lock().unwrap().push(call);
        match self.mode {
            TrackerMode::Failing => Err(TrackingError::Api {
                status: 503,
                message: "tracking server unavailable".to_string(),
            }),
            _ => Ok(()),
        }
    }
}

impl Default for RecordingTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExperimentTracker for RecordingTracker {
    async fn start_run(&self, run_name: &str) -> Result<Option<String>, TrackingError> {
        self.record(TrackerCall::StartRun(run_name.to_string()))?;
        match self.mode {
            TrackerMode::Disabled => Ok(None),
            _ => Ok(Some(format!("run-{}", run_name))),
        }
    }

    async fn log_params(
        &self,
        run_id: &str,
        params: &BTreeMap<String, String>,
    ) -> Result<(), TrackingError> {
        self.record(TrackerCall::LogParams(run_id.to_string(), params.clone()))
    }

    async fn log_metric(&self, run_id: &str, metric: &Metric) -> Result<(), TrackingError> {
        self.record(TrackerCall::LogMetric(
            run_id.to_string(),
            metric.metric_name.clone(),
            metric.value,
        ))
    }

    async fn update_run_status(
        &self,
        run_id: &str,
        status: JobStatus,
    ) -> Result<(), TrackingError> {
        self.record(TrackerCall::UpdateStatus(run_id.to_string(), status))
    }

    async fn search_runs(&self, max_results: u32) -> Result<Vec<TrackedRun>, TrackingError> {
        self.record(TrackerCall::SearchRuns(max_results))?;
        Ok(self
            .runs
            .iter()
            .take(max_results as usize)
            .cloned()
            .collect())
    }
}
