#[cfg(test)]
pub mod memory;
pub mod postgres;

use thiserror::Error;
use uuid::Uuid;

use crate::models::ExtractionJob;

/// Job statuses
pub const STATUS_PENDING: &str = "pending";
pub const STATUS_RUNNING: &str = "running";
pub const STATUS_SUCCEEDED: &str = "succeeded";
pub const STATUS_FAILED: &str = "failed";

/// A terminal job never transitions again.
pub fn is_terminal(status: &str) -> bool {
    status == STATUS_SUCCEEDED || status == STATUS_FAILED
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Job not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),
}

/// Shared job store, authoritative for job state across process restarts.
///
/// All workers and the status/fetch readers go through this. Every
/// transition must be atomic, and a row in a terminal status must never
/// be rewritten; implementations enforce that in the update itself, not
/// at the call site.
pub trait JobStore: Send + Sync {
    /// Insert a new pending job for `url`.
    fn create(&self, url: &str) -> Result<ExtractionJob, StoreError>;

    /// Load a job by id.
    fn get(&self, id: Uuid) -> Result<ExtractionJob, StoreError>;

    /// Mark the job running and record the attempt number.
    fn mark_running(&self, id: Uuid, attempt: i32) -> Result<(), StoreError>;

    /// Terminal success: store the document, clear any error fields.
    fn mark_succeeded(&self, id: Uuid, document: &str) -> Result<(), StoreError>;

    /// Terminal failure: store the error kind and message.
    fn mark_failed(&self, id: Uuid, kind: &str, message: &str) -> Result<(), StoreError>;

    /// Ids of jobs left pending or running by a previous process, oldest
    /// first.
    fn interrupted_ids(&self) -> Result<Vec<Uuid>, StoreError>;
}
