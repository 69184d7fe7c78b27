//! Model registry service
//!
//! Registers and looks up model versions.

use std::sync::Arc;

use crate::domain::entities::{model_version::validate_model_name, ModelVersion, NewModelVersion};
use crate::domain::ports::ModelVersionRepository;
use crate::error::{AppError, DomainError};

/// Service for managing model versions
pub struct ModelRegistryService<MR>
where
    MR: ModelVersionRepository,
{
    versions: Arc<MR>,
}

impl<MR> ModelRegistryService<MR>
where
    MR: ModelVersionRepository,
{
    pub fn new(versions: Arc<MR>) -> Self {
        Self { versions }
    }

    /// Register a new version of a model
    pub async fn register(&self, new_version: NewModelVersion) -> Result<ModelVersion, AppError> {
        new_version.validate()?;

        if self
            .versions
            .find(&new_version.model_name, &new_version.version)
            .await?
            .is_some()
        {
            return Err(DomainError::AlreadyExists(format!(
                "Model '{}' version '{}' already exists",
                new_version.model_name, new_version.version
            ))
            .into());
        }

        let version = self.versions.create(&new_version).await?;
        tracing::info!(
            model = %version.model_name,
            version = %version.version,
            id = %version.id,
            "Registered model version"
        );

        Ok(version)
    }

    /// All versions of a model, newest first
    pub async fn list_versions(&self, model_name: &str) -> Result<Vec<ModelVersion>, AppError> {
        validate_model_name(model_name)?;
        Ok(self.versions.list_by_model(model_name).await?)
    }

    /// Most recently registered version of a model
    pub async fn latest_version(&self, model_name: &str) -> Result<Option<ModelVersion>, AppError> {
        validate_model_name(model_name)?;
        Ok(self.versions.find_latest(model_name).await?)
    }
}
