use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

/// One extraction request, tracked through its whole lifecycle.
///
/// `document` and `error_message` are mutually exclusive: exactly one is
/// set once the job reaches a terminal status, and both are written in
/// the same update as the status itself.
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::extraction_jobs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ExtractionJob {
    pub id: Uuid,
    pub url: String,
    pub status: String,
    pub attempt_count: i32,
    pub error_kind: Option<String>,
    pub error_message: Option<String>,
    pub document: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::extraction_jobs)]
pub struct NewExtractionJob<'a> {
    pub url: &'a str,
}
