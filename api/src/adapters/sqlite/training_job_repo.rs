//! SQLite adapter for TrainingJobRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::domain::entities::{
    JobFilter, JobId, JobStatus, NewHyperparameter, NewTrainingJob, TrainingJob,
};
use crate::domain::ports::TrainingJobRepository;
use crate::entity::{hyperparameters, training_jobs};
use crate::error::DomainError;

/// SQLite implementation of TrainingJobRepository
pub struct SqliteTrainingJobRepository {
    db: DatabaseConnection,
}

impl SqliteTrainingJobRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn not_found(id: &JobId) -> DomainError {
    DomainError::NotFound(format!("Training job {} not found", id))
}

fn db_err(e: DbErr) -> DomainError {
    DomainError::Database(e.to_string())
}

/// Insert the job row and its initial hyperparameters on one connection
async fn insert_job<C>(db: &C, job: &NewTrainingJob) -> Result<training_jobs::Model, DbErr>
where
    C: ConnectionTrait,
{
    let now = Utc::now();

    let model = training_jobs::ActiveModel {
        id: Set(Uuid::new_v4()),
        model_name: Set(job.model_name.clone()),
        status: Set(JobStatus::Pending.to_string()),
        config: Set(job.config.clone()),
        tracking_run_id: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    for (name, value) in &job.hyperparameters {
        let param = NewHyperparameter {
            job_id: JobId(model.id),
            param_name: name.clone(),
            param_value: *value,
        };
        hyperparameters::ActiveModel::from(&param).insert(db).await?;
    }

    Ok(model)
}

#[async_trait]
impl TrainingJobRepository for SqliteTrainingJobRepository {
    async fn create(&self, job: &NewTrainingJob) -> Result<TrainingJob, DomainError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        match insert_job(&txn, job).await {
            Ok(model) => {
                txn.commit().await.map_err(db_err)?;
                model.try_into()
            }
            Err(e) => {
                if let Err(rollback) = txn.rollback().await {
                    tracing::warn!(error = %rollback, "Failed to roll back job creation");
                }
                Err(db_err(e))
            }
        }
    }

    async fn find_by_id(&self, id: &JobId) -> Result<Option<TrainingJob>, DomainError> {
        let result = training_jobs::Entity::find()
            .filter(training_jobs::Column::Id.eq(id.0))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        result.map(TrainingJob::try_from).transpose()
    }

    async fn list(
        &self,
        filter: &JobFilter,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<TrainingJob>, DomainError> {
        let mut query = training_jobs::Entity::find();
        if let Some(status) = filter.status {
            query = query.filter(training_jobs::Column::Status.eq(status.to_string()));
        }
        if let Some(model_name) = &filter.model_name {
            query = query.filter(training_jobs::Column::ModelName.eq(model_name.as_str()));
        }

        let results = query
            .order_by_desc(training_jobs::Column::Seq)
            .limit(limit)
            .offset(offset)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        results.into_iter().map(TrainingJob::try_from).collect()
    }

    async fn update_status(
        &self,
        id: &JobId,
        from: JobStatus,
        to: JobStatus,
    ) -> Result<TrainingJob, DomainError> {
        // Compare-and-set on the stored status
        let result = training_jobs::Entity::update_many()
            .col_expr(training_jobs::Column::Status, Expr::value(to.to_string()))
            .col_expr(training_jobs::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(training_jobs::Column::Id.eq(id.0))
            .filter(training_jobs::Column::Status.eq(from.to_string()))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return match self.find_by_id(id).await? {
                Some(current) => Err(DomainError::Conflict(format!(
                    "Training job {} is {}, expected {}",
                    id, current.status, from
                ))),
                None => Err(not_found(id)),
            };
        }

        self.find_by_id(id).await?.ok_or_else(|| not_found(id))
    }

    async fn set_tracking_run_id(&self, id: &JobId, run_id: &str) -> Result<(), DomainError> {
        let result = training_jobs::Entity::update_many()
            .col_expr(
                training_jobs::Column::TrackingRunId,
                Expr::value(run_id.to_string()),
            )
            .filter(training_jobs::Column::Id.eq(id.0))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(not_found(id));
        }

        Ok(())
    }
}

/// Convert SeaORM model to domain entity
impl TryFrom<training_jobs::Model> for TrainingJob {
    type Error = DomainError;

    fn try_from(model: training_jobs::Model) -> Result<Self, Self::Error> {
        let status = model.status.parse().map_err(|e| {
            DomainError::Internal(format!("Training job {} has bad status: {}", model.id, e))
        })?;

        Ok(TrainingJob {
            id: JobId(model.id),
            model_name: model.model_name,
            status,
            config: model.config,
            tracking_run_id: model.tracking_run_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
