//! CORS configuration

use axum::http::header::{ACCEPT, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};

/// Builds the CORS layer from the configured origin allowlist.
///
/// The relay is a public image endpoint, so an empty allowlist (the
/// default) keeps it open to any origin. Entries that do not parse as
/// header values are skipped; if none survive, the layer falls back to
/// any-origin.
pub fn create_cors_layer(origins: &[String]) -> CorsLayer {
    let methods = [Method::GET, Method::POST, Method::OPTIONS];

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if allowed.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
            .allow_origin(allowed)
            .allow_methods(methods)
            .allow_headers([ACCEPT, CONTENT_TYPE])
    }
}
