pub mod download;
pub mod status;
pub mod submit;

use crate::AppState;
use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;
use uuid::Uuid;

/// Returns the router for extraction endpoints (mounted at /api/extractions)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(submit::submit_extraction))
        .route("/{id}", get(status::get_status))
        .route("/{id}/download", get(download::download_document))
}

/// Where a job's status can be polled.
pub fn status_location(id: Uuid) -> String {
    format!("/api/extractions/{id}")
}

/// Where a succeeded job's document can be downloaded.
pub fn download_location(id: Uuid) -> String {
    format!("/api/extractions/{id}/download")
}

#[derive(OpenApi)]
#[openapi(
    paths(
        submit::submit_extraction,
        status::get_status,
        download::download_document,
    ),
    components(schemas(
        submit::SubmitExtractionRequest,
        submit::SubmitExtractionResponse,
        status::ExtractionStatusResponse,
    ))
)]
pub struct ApiDoc;
