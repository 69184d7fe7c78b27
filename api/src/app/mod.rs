//! Application layer
//!
//! Contains use cases and service orchestration.
//! Services coordinate between domain entities, ports, and external systems.

pub mod metrics_service;
pub mod model_registry_service;
pub mod training_service;

pub use metrics_service::MetricsService;
pub use model_registry_service::ModelRegistryService;
pub use training_service::TrainingService;
