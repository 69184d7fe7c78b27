//! Training service
//!
//! Creates training jobs, drives their status lifecycle and records
//! hyperparameters. Every job is mirrored into the experiment tracker on a
//! best-effort basis: tracker failures are logged and never fail the request.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::entities::{
    model_version::validate_model_name, Hyperparameter, JobFilter, JobId, JobStatus,
    NewHyperparameter, NewTrainingJob, TrainingJob,
};
use crate::domain::ports::{
    ExperimentTracker, HyperparameterRepository, TrackedRun, TrainingJobRepository,
};
use crate::error::{AppError, DomainError};

/// Default page size for job listings
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Largest page a caller may request
pub const MAX_PAGE_SIZE: u64 = 100;

/// Service for managing training jobs
pub struct TrainingService<JR, HR, TR>
where
    JR: TrainingJobRepository,
    HR: HyperparameterRepository,
    TR: ExperimentTracker,
{
    jobs: Arc<JR>,
    hyperparameters: Arc<HR>,
    tracker: Arc<TR>,
}

impl<JR, HR, TR> TrainingService<JR, HR, TR>
where
    JR: TrainingJobRepository,
    HR: HyperparameterRepository,
    TR: ExperimentTracker,
{
    pub fn new(jobs: Arc<JR>, hyperparameters: Arc<HR>, tracker: Arc<TR>) -> Self {
        Self {
            jobs,
            hyperparameters,
            tracker,
        }
    }

    /// Create a training job
    ///
    /// 1. Validates the model name, config and every hyperparameter
    /// 2. Persists the job (status `pending`) and its hyperparameters in one write
    /// 3. Starts a tracker run and logs config + hyperparameters as params
    pub async fn create_job(
        &self,
        model_name: &str,
        hyperparameters: BTreeMap<String, f64>,
        config: serde_json::Value,
    ) -> Result<TrainingJob, AppError> {
        validate_model_name(model_name)?;

        let config = match config {
            serde_json::Value::Null => serde_json::Value::Object(Default::default()),
            serde_json::Value::Object(map) => serde_json::Value::Object(map),
            _ => {
                return Err(AppError::BadRequest(
                    "config must be a JSON object".to_string(),
                ))
            }
        };

        // Validate everything up front so a bad parameter leaves no job behind
        let placeholder = JobId::default();
        for (name, value) in &hyperparameters {
            NewHyperparameter {
                job_id: placeholder,
                param_name: name.clone(),
                param_value: *value,
            }
            .validate()?;
        }

        let mut job = self
            .jobs
            .create(&NewTrainingJob {
                model_name: model_name.to_string(),
                config,
                hyperparameters: hyperparameters.clone(),
            })
            .await?;

        tracing::info!(
            job_id = %job.id,
            model = %job.model_name,
            hyperparameters = hyperparameters.len(),
            "Created training job"
        );

        job.tracking_run_id = self.start_tracking(&job, &hyperparameters).await;
        Ok(job)
    }

    async fn start_tracking(
        &self,
        job: &TrainingJob,
        hyperparameters: &BTreeMap<String, f64>,
    ) -> Option<String> {
        let run_id = match self.tracker.start_run(&job.id.to_string()).await {
            Ok(Some(run_id)) => run_id,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(error = %e, job_id = %job.id, "Failed to start tracking run");
                return None;
            }
        };

        if let Err(e) = self.jobs.set_tracking_run_id(&job.id, &run_id).await {
            tracing::warn!(error = %e, job_id = %job.id, "Failed to store tracking run id");
        }

        let params = tracking_params(job, hyperparameters);
        if !params.is_empty() {
            if let Err(e) = self.tracker.log_params(&run_id, &params).await {
                tracing::warn!(error = %e, run_id = %run_id, "Failed to log job params");
            }
        }

        Some(run_id)
    }

    /// Find a job by ID
    pub async fn get_job(&self, id: &JobId) -> Result<Option<TrainingJob>, AppError> {
        Ok(self.jobs.find_by_id(id).await?)
    }

    /// List jobs, newest first. `limit` is clamped to `1..=MAX_PAGE_SIZE`.
    pub async fn list_jobs(
        &self,
        filter: &JobFilter,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<TrainingJob>, AppError> {
        let limit = limit.clamp(1, MAX_PAGE_SIZE);
        Ok(self.jobs.list(filter, limit, offset).await?)
    }

    /// Move a job to a new status, enforcing the lifecycle rules
    pub async fn update_status(
        &self,
        id: &JobId,
        status: JobStatus,
    ) -> Result<TrainingJob, AppError> {
        let job = self.require_job(id).await?;

        if job.status == status {
            return Ok(job);
        }

        if !job.status.can_transition_to(status) {
            return Err(DomainError::Conflict(format!(
                "Cannot move job {} from {} to {}",
                id, job.status, status
            ))
            .into());
        }

        let updated = self.jobs.update_status(id, job.status, status).await?;
        tracing::info!(job_id = %id, from = %job.status, to = %status, "Job status changed");

        if let Some(run_id) = &updated.tracking_run_id {
            if let Err(e) = self.tracker.update_run_status(run_id, status).await {
                tracing::warn!(error = %e, run_id = %run_id, "Failed to update tracking run status");
            }
        }

        Ok(updated)
    }

    /// Record a hyperparameter for an existing job
    pub async fn log_hyperparameter(
        &self,
        id: &JobId,
        param_name: &str,
        param_value: f64,
    ) -> Result<Hyperparameter, AppError> {
        let job = self.require_job(id).await?;

        let new_param = NewHyperparameter {
            job_id: job.id,
            param_name: param_name.to_string(),
            param_value,
        };
        new_param.validate()?;

        let param = self.hyperparameters.create(&new_param).await?;
        tracing::debug!(job_id = %id, param = %param.param_name, value = param.param_value, "Logged hyperparameter");

        if let Some(run_id) = &job.tracking_run_id {
            let params = BTreeMap::from([(param.param_name.clone(), param.param_value.to_string())]);
            if let Err(e) = self.tracker.log_params(run_id, &params).await {
                tracing::warn!(error = %e, run_id = %run_id, "Failed to mirror hyperparameter");
            }
        }

        Ok(param)
    }

    /// Hyperparameters of an existing job in recording order
    pub async fn list_hyperparameters(&self, id: &JobId) -> Result<Vec<Hyperparameter>, AppError> {
        self.require_job(id).await?;
        Ok(self.hyperparameters.list_by_job(id).await?)
    }

    /// Most recent runs known to the experiment tracker
    pub async fn tracked_runs(&self, max_results: u32) -> Result<Vec<TrackedRun>, AppError> {
        Ok(self.tracker.search_runs(max_results).await?)
    }

    async fn require_job(&self, id: &JobId) -> Result<TrainingJob, AppError> {
        self.jobs
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Training job {} not found", id)))
    }
}

/// Flatten a job config into tracker params.
///
/// Strings are logged verbatim, every other value as compact JSON.
fn config_params(config: &serde_json::Value) -> BTreeMap<String, String> {
    match config {
        serde_json::Value::Object(map) => map
            .iter()
            .map(|(key, value)| {
                let value = match value {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (key.clone(), value)
            })
            .collect(),
        _ => BTreeMap::new(),
    }
}

/// Params mirrored for a new job: its config plus its hyperparameters.
///
/// A hyperparameter wins over a config key of the same name.
fn tracking_params(
    job: &TrainingJob,
    hyperparameters: &BTreeMap<String, f64>,
) -> BTreeMap<String, String> {
    let mut params = config_params(&job.config);
    for (name, value) in hyperparameters {
        if let Some(shadowed) = params.insert(name.clone(), value.to_string()) {
            tracing::warn!(
                job_id = %job.id,
                param = %name,
                config_value = %shadowed,
                "Hyperparameter overrides config value in tracked params"
            );
        }
    }
    params
}
