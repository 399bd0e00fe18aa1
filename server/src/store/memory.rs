//! In-memory job store used by orchestrator and worker tests.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;
use uuid::Uuid;

use crate::models::ExtractionJob;

use super::{is_terminal, JobStore, StoreError, STATUS_FAILED, STATUS_PENDING, STATUS_RUNNING, STATUS_SUCCEEDED};

#[derive(Default)]
pub struct MemoryStore {
    jobs: RwLock<HashMap<Uuid, ExtractionJob>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn update<F>(&self, id: Uuid, apply: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut ExtractionJob),
    {
        let mut jobs = self.jobs.write().unwrap();
        let job = jobs.get_mut(&id).ok_or(StoreError::NotFound)?;
        // Same guard the SQL update carries in its WHERE clause.
        if is_terminal(&job.status) {
            return Ok(());
        }
        apply(job);
        job.updated_at = Utc::now();
        Ok(())
    }
}

impl JobStore for MemoryStore {
    fn create(&self, url: &str) -> Result<ExtractionJob, StoreError> {
        let now = Utc::now();
        let job = ExtractionJob {
            id: Uuid::new_v4(),
            url: url.to_string(),
            status: STATUS_PENDING.to_string(),
            attempt_count: 0,
            error_kind: None,
            error_message: None,
            document: None,
            created_at: now,
            updated_at: now,
        };
        self.jobs.write().unwrap().insert(job.id, job.clone());
        Ok(job)
    }

    fn get(&self, id: Uuid) -> Result<ExtractionJob, StoreError> {
        self.jobs
            .read()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    fn mark_running(&self, id: Uuid, attempt: i32) -> Result<(), StoreError> {
        self.update(id, |job| {
            job.status = STATUS_RUNNING.to_string();
            job.attempt_count = attempt;
        })
    }

    fn mark_succeeded(&self, id: Uuid, document: &str) -> Result<(), StoreError> {
        self.update(id, |job| {
            job.status = STATUS_SUCCEEDED.to_string();
            job.document = Some(document.to_string());
            job.error_kind = None;
            job.error_message = None;
        })
    }

    fn mark_failed(&self, id: Uuid, kind: &str, message: &str) -> Result<(), StoreError> {
        self.update(id, |job| {
            job.status = STATUS_FAILED.to_string();
            job.error_kind = Some(kind.to_string());
            job.error_message = Some(message.to_string());
            job.document = None;
        })
    }

    fn interrupted_ids(&self) -> Result<Vec<Uuid>, StoreError> {
        let jobs = self.jobs.read().unwrap();
        let mut interrupted: Vec<&ExtractionJob> = jobs
            .values()
            .filter(|job| job.status == STATUS_PENDING || job.status == STATUS_RUNNING)
            .collect();
        interrupted.sort_by_key(|job| job.created_at);
        Ok(interrupted.into_iter().map(|job| job.id).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_rows_are_never_rewritten() {
        let store = MemoryStore::new();
        let job = store.create("https://chatgpt.com/share/abc").unwrap();

        store.mark_succeeded(job.id, "the document").unwrap();
        store.mark_failed(job.id, "unknown", "too late").unwrap();
        store.mark_running(job.id, 9).unwrap();

        let job = store.get(job.id).unwrap();
        assert_eq!(job.status, STATUS_SUCCEEDED);
        assert_eq!(job.document.as_deref(), Some("the document"));
        assert!(job.error_message.is_none());
        assert_eq!(job.attempt_count, 0);
    }

    #[test]
    fn result_and_error_are_mutually_exclusive() {
        let store = MemoryStore::new();
        let job = store.create("https://chatgpt.com/share/abc").unwrap();

        store.mark_running(job.id, 1).unwrap();
        store.mark_failed(job.id, "render_timeout", "shell never mounted").unwrap();

        let job = store.get(job.id).unwrap();
        assert_eq!(job.status, STATUS_FAILED);
        assert!(job.document.is_none());
        assert_eq!(job.error_kind.as_deref(), Some("render_timeout"));
    }

    #[test]
    fn interrupted_ids_skips_terminal_jobs() {
        let store = MemoryStore::new();
        let a = store.create("https://chatgpt.com/share/a").unwrap();
        let b = store.create("https://chatgpt.com/share/b").unwrap();
        let c = store.create("https://chatgpt.com/share/c").unwrap();

        store.mark_running(b.id, 1).unwrap();
        store.mark_succeeded(c.id, "done").unwrap();

        let ids = store.interrupted_ids().unwrap();
        assert!(ids.contains(&a.id));
        assert!(ids.contains(&b.id));
        assert!(!ids.contains(&c.id));
    }
}
