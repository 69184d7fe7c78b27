//! MLflow adapter
//!
//! Experiment tracker backed by the MLflow REST API, plus a no-op tracker
//! for deployments without a tracking server.

pub mod client;

pub use client::TrackerBackend;
