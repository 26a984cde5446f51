//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /`        - Health check with store status
//! - `GET  /healthz` - Plain-text liveness probe
//! - `POST /shorten` - Create a short URL
//! - `GET  /{code}`  - Short link redirect
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **CORS** - Any origin may call the API
//! - **Panic recovery** - Panics become JSON 500 responses
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, healthz_handler, redirect_handler};
use crate::api::middleware::{catch_panic, cors, tracing};
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}

/// Routes and middleware without path normalization.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health_handler))
        .route("/healthz", get(healthz_handler))
        .merge(api::routes::api_routes())
        .route("/{code}", get(redirect_handler))
        .with_state(state)
        .layer(catch_panic::layer())
        .layer(cors::layer())
        .layer(tracing::layer())
}
