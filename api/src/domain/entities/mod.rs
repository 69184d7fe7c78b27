//! Domain entities
//!
//! Pure domain models representing core orchestration concepts.
//! These are separate from the SeaORM entities in the `entity` module.

pub mod hyperparameter;
pub mod metric;
pub mod model_version;
pub mod training_job;

pub use hyperparameter::{Hyperparameter, HyperparameterId, NewHyperparameter};
pub use metric::{summarize, Metric, MetricId, MetricSummary, NewMetric};
pub use model_version::{ModelVersion, ModelVersionId, NewModelVersion};
pub use training_job::{JobFilter, JobId, JobStatus, NewTrainingJob, TrainingJob};
