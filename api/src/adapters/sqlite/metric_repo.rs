//! SQLite adapter for MetricRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::domain::entities::{JobId, Metric, MetricId, NewMetric};
use crate::domain::ports::MetricRepository;
use crate::entity::metrics;
use crate::error::DomainError;

/// SQLite implementation of MetricRepository
pub struct SqliteMetricRepository {
    db: DatabaseConnection,
}

impl SqliteMetricRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MetricRepository for SqliteMetricRepository {
    async fn create(&self, metric: &NewMetric) -> Result<Metric, DomainError> {
        let model = metrics::ActiveModel {
            id: Set(Uuid::new_v4()),
            job_id: Set(metric.job_id.0),
            metric_name: Set(metric.metric_name.clone()),
            value: Set(metric.value),
            step: Set(metric.step),
            timestamp: Set(Utc::now()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.into())
    }

    async fn list_by_job(&self, job_id: &JobId) -> Result<Vec<Metric>, DomainError> {
        let results = metrics::Entity::find()
            .filter(metrics::Column::JobId.eq(job_id.0))
            .order_by_asc(metrics::Column::Seq)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }
}

/// Convert SeaORM model to domain entity
impl From<metrics::Model> for Metric {
    fn from(model: metrics::Model) -> Self {
        Metric {
            id: MetricId(model.id),
            job_id: JobId(model.job_id),
            metric_name: model.metric_name,
            value: model.value,
            step: model.step,
            timestamp: model.timestamp,
        }
    }
}
