//! DTOs for health check endpoint.

use serde::Serialize;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    /// `connected` or `disconnected`.
    pub redis: String,
    pub store: String,
    /// Connection manager state after the probe.
    pub state: String,
    pub version: String,
    pub domain: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
