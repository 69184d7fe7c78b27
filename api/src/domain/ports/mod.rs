//! Domain ports (traits)
//!
//! Port traits define interfaces that the domain layer requires.
//! Adapters provide concrete implementations of these traits.

pub mod repositories;
pub mod tracking;

pub use repositories::{
    HyperparameterRepository, MetricRepository, ModelVersionRepository, TrainingJobRepository,
};
pub use tracking::{ExperimentTracker, TrackedRun};
