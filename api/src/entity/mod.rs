//! SeaORM table entities
//!
//! Storage shapes for the SQLite adapters. Domain code never sees these.
//!
//! Every table carries an integer `seq` primary key alongside the public
//! UUID. SQLite stores timestamps as text with a variable number of
//! fractional digits, so insertion order is taken from `seq` rather than
//! from `created_at`.

pub mod hyperparameters;
pub mod metrics;
pub mod model_versions;
pub mod training_jobs;
