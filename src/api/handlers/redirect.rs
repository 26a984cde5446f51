//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::error;

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Look up the code in the store
/// 2. Count the click (best-effort)
/// 3. Return `302 Found` with the original URL in `Location`
///
/// # Errors
///
/// - 404 if the code does not exist or has expired
/// - 503 if the store is unavailable
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let original_url = state.redirect_service.resolve(&code).await?;

    let location = HeaderValue::try_from(original_url).map_err(|e| {
        error!(code = %code, error = %e, "Stored URL is not a valid Location header");
        AppError::internal("Internal server error")
    })?;

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}
