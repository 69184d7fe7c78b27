//! Metric domain entity
//!
//! Named float observations recorded against a training job, e.g. `loss`
//! at step 100. Metrics are append-only.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::training_job::JobId;
use crate::error::DomainError;

/// Unique identifier for a metric record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MetricId(pub Uuid);

impl MetricId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MetricId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MetricId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single metric observation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub id: MetricId,
    pub job_id: JobId,
    pub metric_name: String,
    pub value: f64,
    pub step: Option<i64>,
    pub timestamp: DateTime<Utc>,
}

/// Data needed to record a metric
#[derive(Debug, Clone)]
pub struct NewMetric {
    pub job_id: JobId,
    pub metric_name: String,
    pub value: f64,
    pub step: Option<i64>,
}

impl NewMetric {
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_series_name(&self.metric_name)?;
        validate_finite(&self.metric_name, self.value)?;
        if let Some(step) = self.step {
            if step < 0 {
                return Err(DomainError::Validation(format!(
                    "Step must be non-negative, got {}",
                    step
                )));
            }
        }
        Ok(())
    }
}

/// Aggregate view over all observations of one metric name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSummary {
    pub metric_name: String,
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Value of the most recent observation (highest step, then latest timestamp)
    pub last: f64,
    pub last_step: Option<i64>,
}

/// Summarize metrics per name, sorted by name.
///
/// Input order is treated as recording order and breaks exact ties when
/// choosing the last observation.
pub fn summarize(metrics: &[Metric]) -> Vec<MetricSummary> {
    let mut groups: BTreeMap<&str, Vec<(usize, &Metric)>> = BTreeMap::new();
    for (index, metric) in metrics.iter().enumerate() {
        groups
            .entry(metric.metric_name.as_str())
            .or_default()
            .push((index, metric));
    }

    groups
        .into_iter()
        .filter_map(|(name, group)| {
            let last = group
                .iter()
                .max_by_key(|(index, m)| (m.step, m.timestamp, *index))?
                .1;

            let count = group.len();
            let sum: f64 = group.iter().map(|(_, m)| m.value).sum();
            let min = group
                .iter()
                .map(|(_, m)| m.value)
                .fold(f64::INFINITY, f64::min);
            let max = group
                .iter()
                .map(|(_, m)| m.value)
                .fold(f64::NEG_INFINITY, f64::max);

            Some(MetricSummary {
                metric_name: name.to_string(),
                count,
                min,
                max,
                mean: sum / count as f64,
                last: last.value,
                last_step: last.step,
            })
        })
        .collect()
}

/// Maximum length of a metric or hyperparameter name
pub const MAX_SERIES_NAME_LEN: usize = 250;

fn series_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9_./ -]+$").expect("series name pattern is valid"))
}

/// Validate a metric or hyperparameter name.
///
/// Same character set the MLflow tracking server accepts for keys.
pub fn validate_series_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() || name.chars().count() > MAX_SERIES_NAME_LEN {
        return Err(DomainError::Validation(format!(
            "Name must be between 1 and {} characters",
            MAX_SERIES_NAME_LEN
        )));
    }
    if !series_name_pattern().is_match(name) {
        return Err(DomainError::Validation(format!(
            "Invalid name '{}': allowed characters are [A-Za-z0-9_./ -]",
            name
        )));
    }
    Ok(())
}

/// Reject NaN and infinities
pub fn validate_finite(name: &str, value: f64) -> Result<(), DomainError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(DomainError::Validation(format!(
            "Value for '{}' must be a finite number",
            name
        )))
    }
}
