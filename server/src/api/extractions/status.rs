use crate::api::ErrorResponse;
use crate::jobs::JobError;
use crate::store::STATUS_SUCCEEDED;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ExtractionStatusResponse {
    /// The extraction job ID
    pub job_id: Uuid,
    /// Current job status (pending, running, succeeded, failed)
    pub status: String,
    /// Attempts executed so far
    pub attempt_count: i32,
    /// Where to download the document once succeeded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    /// Terminal failure message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/extractions/{id}",
    tag = "extractions",
    params(
        ("id" = String, Path, description = "Extraction job ID")
    ),
    responses(
        (status = 200, description = "Extraction job status", body = ExtractionStatusResponse),
        (status = 404, description = "Job unknown", body = ErrorResponse)
    )
)]
pub async fn get_status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> impl IntoResponse {
    // A malformed id cannot name a job; report it the same way.
    let Ok(job_id) = job_id.parse::<Uuid>() else {
        return not_found();
    };

    let job = match state.job(job_id) {
        Ok(j) => j,
        Err(JobError::NotFound) => return not_found(),
        Err(e) => {
            tracing::error!(job_id = %job_id, error = %e, "failed to load extraction job");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to load extraction job".to_string(),
                }),
            )
                .into_response();
        }
    };

    let download_url =
        (job.status == STATUS_SUCCEEDED).then(|| super::download_location(job.id));

    (
        StatusCode::OK,
        Json(ExtractionStatusResponse {
            job_id: job.id,
            status: job.status,
            attempt_count: job.attempt_count,
            download_url,
            error: job.error_message,
        }),
    )
        .into_response()
}

fn not_found() -> axum::response::Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "Extraction job not found".to_string(),
        }),
    )
        .into_response()
}
