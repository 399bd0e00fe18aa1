use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::{DbConn, DbPool};
use crate::models::{ExtractionJob, NewExtractionJob};
use crate::schema::extraction_jobs;

use super::{JobStore, StoreError, STATUS_FAILED, STATUS_PENDING, STATUS_RUNNING, STATUS_SUCCEEDED};

/// Production job store backed by Postgres.
///
/// Each transition is a single UPDATE filtered on a non-terminal status,
/// so concurrent readers never observe a half-written terminal row and a
/// terminal row is never rewritten.
pub struct PostgresStore {
    pool: DbPool,
}

impl PostgresStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<DbConn, StoreError> {
        self.pool
            .get()
            .map_err(|e| StoreError::Database(e.to_string()))
    }
}

impl JobStore for PostgresStore {
    fn create(&self, url: &str) -> Result<ExtractionJob, StoreError> {
        let mut conn = self.conn()?;

        diesel::insert_into(extraction_jobs::table)
            .values(&NewExtractionJob { url })
            .get_result::<ExtractionJob>(&mut conn)
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    fn get(&self, id: Uuid) -> Result<ExtractionJob, StoreError> {
        let mut conn = self.conn()?;

        extraction_jobs::table
            .find(id)
            .first::<ExtractionJob>(&mut conn)
            .optional()
            .map_err(|e| StoreError::Database(e.to_string()))?
            .ok_or(StoreError::NotFound)
    }

    fn mark_running(&self, id: Uuid, attempt: i32) -> Result<(), StoreError> {
        let mut conn = self.conn()?;

        diesel::update(
            extraction_jobs::table
                .find(id)
                .filter(extraction_jobs::status.ne_all(vec![STATUS_SUCCEEDED, STATUS_FAILED])),
        )
        .set((
            extraction_jobs::status.eq(STATUS_RUNNING),
            extraction_jobs::attempt_count.eq(attempt),
            extraction_jobs::updated_at.eq(Utc::now()),
        ))
        .execute(&mut conn)
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn mark_succeeded(&self, id: Uuid, document: &str) -> Result<(), StoreError> {
        let mut conn = self.conn()?;

        diesel::update(
            extraction_jobs::table
                .find(id)
                .filter(extraction_jobs::status.ne_all(vec![STATUS_SUCCEEDED, STATUS_FAILED])),
        )
        .set((
            extraction_jobs::status.eq(STATUS_SUCCEEDED),
            extraction_jobs::document.eq(Some(document)),
            extraction_jobs::error_kind.eq(None::<String>),
            extraction_jobs::error_message.eq(None::<String>),
            extraction_jobs::updated_at.eq(Utc::now()),
        ))
        .execute(&mut conn)
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn mark_failed(&self, id: Uuid, kind: &str, message: &str) -> Result<(), StoreError> {
        let mut conn = self.conn()?;

        diesel::update(
            extraction_jobs::table
                .find(id)
                .filter(extraction_jobs::status.ne_all(vec![STATUS_SUCCEEDED, STATUS_FAILED])),
        )
        .set((
            extraction_jobs::status.eq(STATUS_FAILED),
            extraction_jobs::error_kind.eq(Some(kind)),
            extraction_jobs::error_message.eq(Some(message)),
            extraction_jobs::document.eq(None::<String>),
            extraction_jobs::updated_at.eq(Utc::now()),
        ))
        .execute(&mut conn)
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn interrupted_ids(&self) -> Result<Vec<Uuid>, StoreError> {
        let mut conn = self.conn()?;

        extraction_jobs::table
            .filter(extraction_jobs::status.eq_any(vec![STATUS_PENDING, STATUS_RUNNING]))
            .order(extraction_jobs::created_at.asc())
            .select(extraction_jobs::id)
            .load::<Uuid>(&mut conn)
            .map_err(|e| StoreError::Database(e.to_string()))
    }
}
