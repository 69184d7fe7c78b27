//! SQLite adapter for HyperparameterRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::domain::entities::{Hyperparameter, HyperparameterId, JobId, NewHyperparameter};
use crate::domain::ports::HyperparameterRepository;
use crate::entity::hyperparameters;
use crate::error::DomainError;

/// SQLite implementation of HyperparameterRepository
pub struct SqliteHyperparameterRepository {
    db: DatabaseConnection,
}

impl SqliteHyperparameterRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl HyperparameterRepository for SqliteHyperparameterRepository {
    async fn create(&self, param: &NewHyperparameter) -> Result<Hyperparameter, DomainError> {
        let result = hyperparameters::ActiveModel::from(param)
            .insert(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.into())
    }

    async fn list_by_job(&self, job_id: &JobId) -> Result<Vec<Hyperparameter>, DomainError> {
        let results = hyperparameters::Entity::find()
            .filter(hyperparameters::Column::JobId.eq(job_id.0))
            .order_by_asc(hyperparameters::Column::Seq)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }
}

/// Row for a new hyperparameter; also used when a job is created with its
/// initial hyperparameters
impl From<&NewHyperparameter> for hyperparameters::ActiveModel {
    fn from(param: &NewHyperparameter) -> Self {
        hyperparameters::ActiveModel {
            id: Set(Uuid::new_v4()),
            job_id: Set(param.job_id.0),
            param_name: Set(param.param_name.clone()),
            param_value: Set(param.param_value),
            timestamp: Set(Utc::now()),
            ..Default::default()
        }
    }
}

/// Convert SeaORM model to domain entity
impl From<hyperparameters::Model> for Hyperparameter {
    fn from(model: hyperparameters::Model) -> Self {
        Hyperparameter {
            id: HyperparameterId(model.id),
            job_id: JobId(model.job_id),
            param_name: model.param_name,
            param_value: model.param_value,
            timestamp: model.timestamp,
        }
    }
}
