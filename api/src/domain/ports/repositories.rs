//! Repository port traits
//!
//! These traits define the interface for data persistence.
//! Implementations are provided by adapters (e.g., SQLite).

use async_trait::async_trait;

use crate::domain::entities::{
    Hyperparameter, JobFilter, JobId, JobStatus, Metric, ModelVersion, NewHyperparameter,
    NewMetric, NewModelVersion, NewTrainingJob, TrainingJob,
};
use crate::error::DomainError;

/// Repository for ModelVersion entities
#[async_trait]
pub trait ModelVersionRepository: Send + Sync {
    /// Register a new version.
    ///
    /// Fails with `AlreadyExists` when the (model_name, version) pair is taken.
    async fn create(&self, version: &NewModelVersion) -> Result<ModelVersion, DomainError>;

    /// Find a specific version of a model
    async fn find(
        &self,
        model_name: &str,
        version: &str,
    ) -> Result<Option<ModelVersion>, DomainError>;

    /// List all versions of a model, newest first
    async fn list_by_model(&self, model_name: &str) -> Result<Vec<ModelVersion>, DomainError>;

    /// Most recently registered version of a model
    async fn find_latest(&self, model_name: &str) -> Result<Option<ModelVersion>, DomainError>;
}

/// Repository for TrainingJob entities
#[async_trait]
pub trait TrainingJobRepository: Send + Sync {
    /// Create a job in `pending` status together with its initial
    /// hyperparameters. Either everything is stored or nothing is.
    async fn create(&self, job: &NewTrainingJob) -> Result<TrainingJob, DomainError>;

    /// Find a job by ID
    async fn find_by_id(&self, id: &JobId) -> Result<Option<TrainingJob>, DomainError>;

    /// List jobs matching the filter, newest first
    async fn list(
        &self,
        filter: &JobFilter,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<TrainingJob>, DomainError>;

    /// Move a job from `from` to `to` and bump `updated_at`.
    ///
    /// The write only applies while the stored status is still `from`;
    /// otherwise fails with `Conflict` (or `NotFound` if the job is gone).
    async fn update_status(
        &self,
        id: &JobId,
        from: JobStatus,
        to: JobStatus,
    ) -> Result<TrainingJob, DomainError>;

    /// Remember the experiment tracker run backing this job
    async fn set_tracking_run_id(&self, id: &JobId, run_id: &str) -> Result<(), DomainError>;
}

/// Repository for Metric entities
#[async_trait]
pub trait MetricRepository: Send + Sync {
    /// Record a metric observation
    async fn create(&self, metric: &NewMetric) -> Result<Metric, DomainError>;

    /// All metrics of a job in recording order
    async fn list_by_job(&self, job_id: &JobId) -> Result<Vec<Metric>, DomainError>;
}

/// Repository for Hyperparameter entities
#[async_trait]
pub trait HyperparameterRepository: Send + Sync {
    /// Record a hyperparameter value
    async fn create(&self, param: &NewHyperparameter) -> Result<Hyperparameter, DomainError>;

    /// All hyperparameters of a job in recording order
    async fn list_by_job(&self, job_id: &JobId) -> Result<Vec<Hyperparameter>, DomainError>;
}
