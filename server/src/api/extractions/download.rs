use crate::api::ErrorResponse;
use crate::jobs::JobError;
use crate::store::{STATUS_FAILED, STATUS_SUCCEEDED};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

/// Fixed archival filename suggested for every downloaded document.
pub const ARCHIVE_FILENAME: &str = "archived_conversation.md";

#[utoipa::path(
    get,
    path = "/api/extractions/{id}/download",
    tag = "extractions",
    params(
        ("id" = String, Path, description = "Extraction job ID")
    ),
    responses(
        (status = 200, description = "Archived document as a Markdown attachment"),
        (status = 404, description = "Job unknown or failed", body = ErrorResponse),
        (status = 425, description = "Extraction still in progress", body = ErrorResponse),
        (status = 500, description = "Stored document failed its sanity check", body = ErrorResponse)
    )
)]
pub async fn download_document(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Response {
    let Ok(job_id) = job_id.parse::<Uuid>() else {
        return not_found("Extraction job not found".to_string());
    };

    let job = match state.job(job_id) {
        Ok(j) => j,
        Err(JobError::NotFound) => return not_found("Extraction job not found".to_string()),
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

    match job.status.as_str() {
        STATUS_SUCCEEDED => {}
        STATUS_FAILED => {
            let message = job
                .error_message
                .unwrap_or_else(|| "Extraction failed".to_string());
            return not_found(message);
        }
        _ => {
            return (
                StatusCode::TOO_EARLY,
                Json(ErrorResponse {
                    error: "The document is not ready yet".to_string(),
                }),
            )
                .into_response();
        }
    }

    let document = match job.document {
        Some(doc) if doc.len() >= state.min_document_len() => doc,
        _ => {
            tracing::error!(job_id = %job.id, "succeeded job has no usable document");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Stored document failed its sanity check".to_string(),
                }),
            )
                .into_response();
        }
    };

    (
        StatusCode::OK,
        [
            (
                header::CONTENT_TYPE,
                "text/markdown; charset=utf-8".to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{ARCHIVE_FILENAME}\""),
            ),
        ],
        document,
    )
        .into_response()
}

fn not_found(message: String) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse { error: message }),
    )
        .into_response()
}
