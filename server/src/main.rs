mod api;
mod config;
mod db;
mod jobs;
mod models;
mod schema;
mod store;

use std::env;
use std::sync::Arc;

use axum::extract::MatchedPath;
use axum::http::Request;
use axum::Router;
use tokio::sync::mpsc;
use tower_http::trace::TraceLayer;
use tracing::Span;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use utoipa_swagger_ui::SwaggerUi;

use jobs::extractor::ChromeExtractor;
use jobs::worker::{WorkerPool, QUEUE_CAPACITY};
use jobs::{Orchestrator, RetryPolicy};
use store::postgres::PostgresStore;
use store::JobStore;

/// Application state shared across all handlers
pub type AppState = Arc<Orchestrator>;

fn init_telemetry() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() {
    // Check for --openapi flag to dump spec and exit
    if env::args().any(|arg| arg == "--openapi") {
        let spec = api::openapi().to_pretty_json().unwrap();
        println!("{}", spec);
        return;
    }

    init_telemetry();

    let config = config::ServerConfig::from_env();

    let pool = db::create_pool(&config.database_url);
    let store: Arc<dyn JobStore> = Arc::new(PostgresStore::new(pool));

    let extractor = Arc::new(ChromeExtractor::new(config.extractor.clone()));
    let (queue_tx, queue_rx) = mpsc::channel(QUEUE_CAPACITY);

    let orchestrator: AppState = Arc::new(Orchestrator::new(
        store,
        extractor,
        config.extractor.clone(),
        RetryPolicy::default(),
        queue_tx,
    ));

    let _worker_pool = WorkerPool::start(
        queue_rx,
        orchestrator.clone(),
        config.worker_pool.clone(),
    );

    // Jobs interrupted by the previous process pick up where they left off.
    if let Err(e) = orchestrator.requeue_interrupted() {
        tracing::warn!(error = %e, "failed to re-enqueue interrupted jobs");
    }

    let swagger_ui = SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api::openapi());

    let app = Router::new()
        .merge(api::public::router())
        .nest("/api/extractions", api::extractions::router())
        .merge(swagger_ui)
        .with_state(orchestrator)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    let matched_path = request
                        .extensions()
                        .get::<MatchedPath>()
                        .map(MatchedPath::as_str)
                        .unwrap_or(request.uri().path());

                    // Don't create a span at all for noisy endpoints
                    if matched_path == "/healthz" {
                        tracing::trace_span!("http_request")
                    } else {
                        tracing::info_span!(
                            "http_request",
                            method = %request.method(),
                            path = %matched_path,
                        )
                    }
                })
                .on_request(|_request: &Request<_>, _span: &Span| {})
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        // Skip logging for noisy endpoints (trace-level spans)
                        if span.metadata().map(|m| m.level()) == Some(&tracing::Level::TRACE) {
                            return;
                        }
                        let status = response.status().as_u16();
                        if status >= 500 {
                            tracing::error!(
                                status = %status,
                                latency_ms = %latency.as_millis(),
                                "request failed with server error"
                            );
                        } else {
                            tracing::info!(
                                status = %status,
                                latency_ms = %latency.as_millis(),
                                "request completed"
                            );
                        }
                    },
                )
                .on_failure(
                    |error: tower_http::classify::ServerErrorsFailureClass,
                     latency: std::time::Duration,
                     _span: &Span| {
                        tracing::error!(
                            error = %error,
                            latency_ms = %latency.as_millis(),
                            "request failed"
                        );
                    },
                ),
        );

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind listener");

    tracing::info!("Server listening on {}", listener.local_addr().unwrap());
    tracing::info!("Swagger UI available at /swagger-ui/");
    tracing::info!("OpenAPI spec available at /api-docs/openapi.json");

    axum::serve(listener, app).await.unwrap();
}
