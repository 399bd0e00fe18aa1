use crate::api::ErrorResponse;
use crate::jobs::JobError;
use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SubmitExtractionRequest {
    /// Shared-conversation URL to archive
    pub url: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SubmitExtractionResponse {
    /// The extraction job ID
    pub job_id: Uuid,
    /// Where to poll for progress
    pub status_url: String,
}

#[utoipa::path(
    post,
    path = "/api/extractions",
    tag = "extractions",
    request_body = SubmitExtractionRequest,
    responses(
        (status = 202, description = "Extraction job accepted", body = SubmitExtractionResponse),
        (status = 400, description = "Missing or invalid URL", body = ErrorResponse),
        (status = 503, description = "Job queue unavailable", body = ErrorResponse)
    )
)]
pub async fn submit_extraction(
    State(state): State<AppState>,
    Json(request): Json<SubmitExtractionRequest>,
) -> impl IntoResponse {
    let job = match state.submit(&request.url) {
        Ok(job) => job,
        Err(e @ JobError::InvalidUrl(_)) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response();
        }
        Err(e @ JobError::QueueUnavailable(_)) => {
            tracing::error!(error = %e, "submission rejected, queue unavailable");
            return (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response();
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to create extraction job");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to create extraction job".to_string(),
                }),
            )
                .into_response();
        }
    };

    (
        StatusCode::ACCEPTED,
        Json(SubmitExtractionResponse {
            job_id: job.id,
            status_url: super::status_location(job.id),
        }),
    )
        .into_response()
}
