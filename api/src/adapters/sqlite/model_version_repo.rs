//! SQLite adapter for ModelVersionRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::map_db_err;
use crate::domain::entities::{ModelVersion, ModelVersionId, NewModelVersion};
use crate::domain::ports::ModelVersionRepository;
use crate::entity::model_versions;
use crate::error::DomainError;

/// SQLite implementation of ModelVersionRepository
pub struct SqliteModelVersionRepository {
    db: DatabaseConnection,
}

impl SqliteModelVersionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ModelVersionRepository for SqliteModelVersionRepository {
    async fn create(&self, version: &NewModelVersion) -> Result<ModelVersion, DomainError> {
        let model = model_versions::ActiveModel {
            id: Set(Uuid::new_v4()),
            model_name: Set(version.model_name.clone()),
            version: Set(version.version.clone()),
            description: Set(version.description.clone()),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            map_db_err(e, || {
                format!(
                    "Model '{}' version '{}' already exists",
                    version.model_name, version.version
                )
            })
        })?;

        Ok(result.into())
    }

    async fn find(
        &self,
        model_name: &str,
        version: &str,
    ) -> Result<Option<ModelVersion>, DomainError> {
        let result = model_versions::Entity::find()
            .filter(model_versions::Column::ModelName.eq(model_name))
            .filter(model_versions::Column::Version.eq(version))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn list_by_model(&self, model_name: &str) -> Result<Vec<ModelVersion>, DomainError> {
        let results = model_versions::Entity::find()
            .filter(model_versions::Column::ModelName.eq(model_name))
            .order_by_desc(model_versions::Column::Seq)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn find_latest(&self, model_name: &str) -> Result<Option<ModelVersion>, DomainError> {
        let result = model_versions::Entity::find()
            .filter(model_versions::Column::ModelName.eq(model_name))
            .order_by_desc(model_versions::Column::Seq)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }
}

/// Convert SeaORM model to domain entity
impl From<model_versions::Model> for ModelVersion {
    fn from(model: model_versions::Model) -> Self {
        ModelVersion {
            id: ModelVersionId(model.id),
            model_name: model.model_name,
            version: model.version,
            description: model.description,
            created_at: model.created_at,
        }
    }
}
