//! Test utilities
//!
//! In-memory port implementations and fixtures for unit testing services
//! without a database or a tracking server, plus a local MLflow stand-in
//! for the HTTP tracker.

pub mod fixtures;
pub mod mlflow_stub;
pub mod mocks;

pub use fixtures::*;
pub use mlflow_stub::{MlflowStub, StubMode};
pub use mocks::*;
