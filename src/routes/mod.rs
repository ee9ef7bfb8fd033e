//! Router assembly: HTTP endpoints, CORS, and HTTP tracing.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod http;

/// Build the application router with:
/// - Identifier codec API under `/api/v1/id/...`
/// - Taxonomy configuration API under `/api/v1/taxonomy/...`
/// - CORS (allow any origin/method/headers) – adjust for production if needed
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/health", get(http::http_health))
        // Identifier codec (pure, no state beyond the taxonomy for describe)
        .route("/api/v1/id/parse", get(http::http_parse))
        .route("/api/v1/id/validate", get(http::http_validate))
        .route("/api/v1/id/generate", post(http::http_generate))
        .route("/api/v1/id/describe", get(http::http_describe))
        // Taxonomy configuration
        .route("/api/v1/taxonomy/structure", get(http::http_get_structure))
        .route(
            "/api/v1/taxonomy/config",
            get(http::http_get_config).put(http::http_update_config),
        )
        .route("/api/v1/taxonomy/config/import", post(http::http_import_config))
        .route("/api/v1/taxonomy/config/export", get(http::http_export_config))
        .route("/api/v1/taxonomy/config/reset", post(http::http_reset_config))
        // State + CORS + HTTP tracing
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}
