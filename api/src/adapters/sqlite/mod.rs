//! SQLite adapters
//!
//! Implementations of repository traits using SeaORM and SQLite.

pub mod hyperparameter_repo;
pub mod metric_repo;
pub mod model_version_repo;
pub mod schema;
pub mod training_job_repo;


pub use hyperparameter_repo::SqliteHyperparameterRepository;
pub use metric_repo::SqliteMetricRepository;
pub use model_version_repo::SqliteModelVersionRepository;
pub use schema::connect;
pub use training_job_repo::SqliteTrainingJobRepository;

use sea_orm::{DbErr, SqlErr};

use crate::error::DomainError;

/// Map a SeaORM error to a domain error, surfacing unique violations
pub(crate) fn map_db_err(err: DbErr, what: impl FnOnce() -> String) -> DomainError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => DomainError::AlreadyExists(what()),
        _ => DomainError::Database(err.to_string()),
    }
}
