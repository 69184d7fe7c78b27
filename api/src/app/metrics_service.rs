//! Metrics service
//!
//! Records metric observations for training jobs and aggregates them.

use std::sync::Arc;

use crate::domain::entities::{summarize, JobId, Metric, MetricSummary, NewMetric, TrainingJob};
use crate::domain::ports::{ExperimentTracker, MetricRepository, TrainingJobRepository};
use crate::error::AppError;

/// Service for job metrics
pub struct MetricsService<JR, MR, TR>
where
    JR: TrainingJobRepository,
    MR: MetricRepository,
    TR: ExperimentTracker,
{
    jobs: Arc<JR>,
    metrics: Arc<MR>,
    tracker: Arc<TR>,
}

impl<JR, MR, TR> MetricsService<JR, MR, TR>
where
    JR: TrainingJobRepository,
    MR: MetricRepository,
    TR: ExperimentTracker,
{
    pub fn new(jobs: Arc<JR>, metrics: Arc<MR>, tracker: Arc<TR>) -> Self {
        Self {
            jobs,
            metrics,
            tracker,
        }
    }

    /// Record a metric observation for an existing job
    pub async fn log_metric(
        &self,
        job_id: &JobId,
        metric_name: &str,
        value: f64,
        step: Option<i64>,
    ) -> Result<Metric, AppError> {
        let job = self.require_job(job_id).await?;

        let new_metric = NewMetric {
            job_id: job.id,
            metric_name: metric_name.to_string(),
            value,
            step,
        };
        new_metric.validate()?;

        let metric = self.metrics.create(&new_metric).await?;
        tracing::debug!(
            job_id = %job_id,
            metric = %metric.metric_name,
            value = metric.value,
            step = ?metric.step,
            "Logged metric"
        );

        if let Some(run_id) = &job.tracking_run_id {
            if let Err(e) = self.tracker.log_metric(run_id, &metric).await {
                tracing::warn!(error = %e, run_id = %run_id, "Failed to mirror metric");
            }
        }

        Ok(metric)
    }

    /// Metrics of an existing job in recording order
    pub async fn list_metrics(&self, job_id: &JobId) -> Result<Vec<Metric>, AppError> {
        self.require_job(job_id).await?;
        Ok(self.metrics.list_by_job(job_id).await?)
    }

    /// Per-metric aggregates for an existing job
    pub async fn summarize(&self, job_id: &JobId) -> Result<Vec<MetricSummary>, AppError> {
        let metrics = self.list_metrics(job_id).await?;
        Ok(summarize(&metrics))
    }

    async fn require_job(&self, id: &JobId) -> Result<TrainingJob, AppError> {
        self.jobs
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Training job {} not found", id)))
    }
}
