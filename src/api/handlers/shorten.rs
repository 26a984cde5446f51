//! Handler for link shortening endpoint.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use tracing::warn;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short URL.
///
/// # Endpoint
///
/// `POST /shorten`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/a" }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// {
///   "short_url": "http://short.ly/aB3xY9",
///   "original_url": "https://example.com/a",
///   "code": "aB3xY9"
/// }
/// ```
///
/// # Errors
///
/// - 400 if the body is not JSON, `url` is missing/empty, or the URL is invalid
/// - 503 if the store is unavailable
pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!(error = %rejection, "Rejected shorten request body");
        AppError::bad_request("Invalid JSON body")
    })?;

    let link = state
        .shorten_service
        .shorten(request.url.as_deref().unwrap_or_default())
        .await?;

    Ok((StatusCode::CREATED, Json(link.into())))
}
