pub mod extractor;
pub mod worker;

use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::sync::mpsc;
use uuid::Uuid;

use chatvault_core::{validate_share_url, ErrorKind, ExtractorConfig};

use crate::models::ExtractionJob;
use crate::store::{is_terminal, JobStore, StoreError};

use extractor::Extractor;

/// Longest URL accepted at the submission boundary.
pub const MAX_URL_LENGTH: usize = 2048;

#[derive(Error, Debug)]
pub enum JobError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Job not found")]
    NotFound,

    #[error("Job store error: {0}")]
    Store(String),

    #[error("Job queue unavailable: {0}")]
    QueueUnavailable(String),
}

impl From<StoreError> for JobError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound => JobError::NotFound,
            other => JobError::Store(other.to_string()),
        }
    }
}

/// Retry and scheduling policy applied to every job.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retries after the first attempt; a job runs at most
    /// `max_retries + 1` times.
    pub max_retries: i32,
    /// Fixed delay between attempts. No exponential growth.
    pub backoff: Duration,
    /// Wall-clock budget across all attempts of one job.
    pub budget: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff: Duration::from_secs(5),
            budget: Duration::from_secs(15 * 60),
        }
    }
}

/// Owns job records for their full lifetime: accepts submissions,
/// schedules execution, applies the retry policy, and serves the
/// status/fetch reads.
pub struct Orchestrator {
    store: Arc<dyn JobStore>,
    extractor: Arc<dyn Extractor>,
    extractor_config: ExtractorConfig,
    policy: RetryPolicy,
    queue: mpsc::Sender<Uuid>,
}

impl Orchestrator {
    pub fn new(
        store: Arc<dyn JobStore>,
        extractor: Arc<dyn Extractor>,
        extractor_config: ExtractorConfig,
        policy: RetryPolicy,
        queue: mpsc::Sender<Uuid>,
    ) -> Self {
        Self {
            store,
            extractor,
            extractor_config,
            policy,
            queue,
        }
    }

    /// Validate and accept a submission. Returns as soon as the job is
    /// recorded and queued; extraction happens out of band.
    pub fn submit(&self, url: &str) -> Result<ExtractionJob, JobError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(JobError::InvalidUrl("URL must not be empty".to_string()));
        }
        if url.len() > MAX_URL_LENGTH {
            return Err(JobError::InvalidUrl(format!(
                "URL exceeds {MAX_URL_LENGTH} bytes"
            )));
        }
        validate_share_url(url, &self.extractor_config.target_host)
            .map_err(|e| JobError::InvalidUrl(e.to_string()))?;

        let job = self.store.create(url)?;
        tracing::info!(job_id = %job.id, url, "accepted extraction job");

        if let Err(e) = self.queue.try_send(job.id) {
            tracing::error!(job_id = %job.id, error = %e, "failed to enqueue job");
            let _ = self.store.mark_failed(
                job.id,
                ErrorKind::Unknown.as_str(),
                "job queue unavailable at submission",
            );
            return Err(JobError::QueueUnavailable(e.to_string()));
        }

        Ok(job)
    }

    /// Current state of a job.
    pub fn job(&self, id: Uuid) -> Result<ExtractionJob, JobError> {
        Ok(self.store.get(id)?)
    }

    /// Minimum byte length a stored document must have to be served.
    pub fn min_document_len(&self) -> usize {
        self.extractor_config.min_document_len
    }

    /// Re-enqueue jobs a previous process left pending or running. The
    /// stored attempt count carries over, so the attempt bound holds
    /// across restarts.
    pub fn requeue_interrupted(&self) -> Result<usize, JobError> {
        let ids = self.store.interrupted_ids()?;
        let count = ids.len();
        for id in ids {
            self.queue
                .try_send(id)
                .map_err(|e| JobError::QueueUnavailable(e.to_string()))?;
        }
        if count > 0 {
            tracing::info!(count, "re-enqueued interrupted jobs");
        }
        Ok(count)
    }

    /// Run a claimed job to a terminal state. Calling this on a job that
    /// is already terminal does nothing.
    pub async fn process(&self, job_id: Uuid) {
        if let Err(e) = self.run_attempts(job_id).await {
            tracing::warn!(job_id = %job_id, error = %e, "job processing error");
        }
    }

    async fn run_attempts(&self, job_id: Uuid) -> Result<(), JobError> {
        let job = self.store.get(job_id)?;
        if is_terminal(&job.status) {
            return Ok(());
        }

        let started = Instant::now();
        let mut attempt = job.attempt_count;

        loop {
            attempt += 1;
            self.store.mark_running(job_id, attempt)?;
            tracing::info!(job_id = %job_id, attempt, url = %job.url, "running extraction attempt");

            let error = match self.extractor.extract(&job.url).await {
                Ok(document) => {
                    self.store.mark_succeeded(job_id, &document)?;
                    tracing::info!(job_id = %job_id, attempt, bytes = document.len(), "job succeeded");
                    return Ok(());
                }
                Err(e) => e,
            };

            if !error.is_retryable() {
                tracing::warn!(job_id = %job_id, attempt, error = %error, "job failed, not retryable");
                self.store
                    .mark_failed(job_id, error.kind().as_str(), &error.to_string())?;
                return Ok(());
            }

            if attempt > self.policy.max_retries {
                tracing::warn!(job_id = %job_id, attempt, error = %error, "job failed, retries exhausted");
                self.store
                    .mark_failed(job_id, error.kind().as_str(), &error.to_string())?;
                return Ok(());
            }

            if started.elapsed() + self.policy.backoff >= self.policy.budget {
                tracing::warn!(job_id = %job_id, attempt, "job failed, wall-clock budget exceeded");
                self.store.mark_failed(
                    job_id,
                    ErrorKind::Timeout.as_str(),
                    "extraction did not finish within the job time budget",
                )?;
                return Ok(());
            }

            tokio::time::sleep(self.policy.backoff).await;
        }
    }
}
