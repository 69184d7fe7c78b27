//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.

use chrono::Utc;
use serde_json::json;

use crate::domain::entities::{
    JobId, JobStatus, ModelVersion, ModelVersionId, NewModelVersion, TrainingJob,
};

/// Create a registered model version
pub fn test_model_version(model_name: &str, version: &str) -> ModelVersion {
    ModelVersion {
        id: ModelVersionId::new(),
        model_name: model_name.to_string(),
        version: version.to_string(),
        description: None,
        created_at: Utc::now(),
    }
}

/// Registration request for a model version
pub fn new_model_version(model_name: &str, version: &str) -> NewModelVersion {
    NewModelVersion {
        model_name: model_name.to_string(),
        version: version.to_string(),
        description: None,
    }
}

/// Create a training job in the given status
pub fn test_job(model_name: &str, status: JobStatus) -> TrainingJob {
    let now = Utc::now();
    TrainingJob {
        id: JobId::new(),
        model_name: model_name.to_string(),
        status,
        config: json!({"epochs": 10}),
        tracking_run_id: None,
        created_at: now,
        updated_at: now,
    }
}
