//! Router assembly
//!
//! Builds the `/api` routes plus the health probe and stacks the shared
//! middleware: request tracing, CORS, security headers, gzip compression
//! and the request body cap.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn;
use axum::routing::{get, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{get_files, get_files_paginated, upload_image, MAX_UPLOAD_BYTES};
use crate::middleware::{create_cors_layer, security_headers};
use crate::AppState;

/// Headroom above the file cap so multipart framing never trips the body
/// limit before the handler's own size check runs
const BODY_LIMIT_SLACK: usize = 64 * 1024;

/// Creates the application router with all routes and middleware
pub fn create_router(state: Arc<AppState>, cors_origins: &[String]) -> Router {
    let api_routes = Router::new()
        .route("/upload/image", post(upload_image))
        .route("/files", get(get_files))
        .route("/files/paginated", get(get_files_paginated));

    Router::new()
        .nest("/api", api_routes)
        .route("/health", get(health_check))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins))
                .layer(from_fn(security_headers))
                .layer(CompressionLayer::new())
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + BODY_LIMIT_SLACK)),
        )
        .with_state(state)
}

/// Liveness probe
async fn health_check() -> &'static str {
    "OK"
}
