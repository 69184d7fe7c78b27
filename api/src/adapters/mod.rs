//! Adapters layer
//!
//! Implementations of port traits for external systems.

pub mod mlflow;
pub mod sqlite;

pub use mlflow::TrackerBackend;
pub use sqlite::{
    SqliteHyperparameterRepository, SqliteMetricRepository, SqliteModelVersionRepository,
    SqliteTrainingJobRepository,
};
