//! Hyperparameter domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::metric::{validate_finite, validate_series_name};
use super::training_job::JobId;
use crate::error::DomainError;

/// Unique identifier for a hyperparameter record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HyperparameterId(pub Uuid);

impl HyperparameterId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for HyperparameterId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for HyperparameterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A hyperparameter value recorded for a training job
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hyperparameter {
    pub id: HyperparameterId,
    pub job_id: JobId,
    pub param_name: String,
    pub param_value: f64,
    pub timestamp: DateTime<Utc>,
}

/// Data needed to record a hyperparameter
#[derive(Debug, Clone)]
pub struct NewHyperparameter {
    pub job_id: JobId,
    pub param_name: String,
    pub param_value: f64,
}

impl NewHyperparameter {
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_series_name(&self.param_name)?;
        validate_finite(&self.param_name, self.param_value)
    }
}
