pub mod health;

use crate::AppState;
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for public endpoints (no job state involved)
pub fn router() -> Router<AppState> {
    Router::new().route("/healthz", get(health::health))
}

#[derive(OpenApi)]
#[openapi(
    paths(health::health),
    components(schemas(health::HealthResponse))
)]
pub struct ApiDoc;
