//! Handlers for health check endpoints.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::HealthResponse;
use crate::state::AppState;

/// Returns service health with a live store probe.
///
/// # Endpoint
///
/// `GET /`
///
/// # Response Codes
///
/// - **200 OK**: Store reachable
/// - **503 Service Unavailable**: Store unreachable
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "redis": "connected",
///   "store": "connected",
///   "state": "connected",
///   "version": "0.1.0",
///   "domain": "short.ly"
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let probe = state.store.acquire().await;

    let mut response = HealthResponse {
        status: "healthy".to_string(),
        redis: "connected".to_string(),
        store: "connected".to_string(),
        state: state.store.state().to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        domain: state.base_domain.to_string(),
        error: None,
    };

    match probe {
        Ok(_) => Ok(Json(response)),
        Err(e) => {
            response.status = "unhealthy".to_string();
            response.redis = "disconnected".to_string();
            response.store = "unavailable".to_string();
            response.error = Some(e.to_string());
            Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
        }
    }
}

/// Plain-text liveness check for orchestrators.
///
/// # Endpoint
///
/// `GET /healthz`
pub async fn healthz_handler(State(state): State<AppState>) -> (StatusCode, &'static str) {
    match state.store.acquire().await {
        Ok(_) => (StatusCode::OK, "OK"),
        Err(_) => (StatusCode::SERVICE_UNAVAILABLE, "Store unavailable"),
    }
}
