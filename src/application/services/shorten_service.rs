//! Short link creation service.

use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::LinkSettings;
use crate::domain::entities::{ShortCode, ShortenedLink};
use crate::domain::repositories::{StoreError, StoreHandle};
use crate::error::AppError;
use crate::infrastructure::store::ConnectionManager;
use crate::utils::code_generator::CodeGenerator;
use crate::utils::url_validator::validate_url;

/// Service for creating short links.
///
/// Validates the URL, draws a random code and reserves it with a conditional
/// write, so an existing mapping is never overwritten. On a collision a new code
/// is drawn, up to [`LinkSettings::allocation_attempts`] times.
pub struct ShortenService {
    store: Arc<ConnectionManager>,
    generator: CodeGenerator,
    settings: LinkSettings,
}

impl ShortenService {
    /// Creates a new shortening service.
    pub fn new(store: Arc<ConnectionManager>, settings: LinkSettings) -> Self {
        Self {
            store,
            generator: CodeGenerator::new(settings.code_length),
            settings,
        }
    }

    /// Creates a short link for `raw_url`.
    ///
    /// Surrounding whitespace is trimmed before validation; the trimmed URL is what
    /// gets stored and returned.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::BadRequest`] if:
    /// - the input is empty (`URL is required`)
    /// - the URL is not an absolute http/https URL (`Invalid URL format`)
    ///
    /// Returns [`AppError::ServiceUnavailable`] if the store cannot be reached or
    /// fails the write (`Storage error`), or if every attempted code was taken.
    pub async fn shorten(&self, raw_url: &str) -> Result<ShortenedLink, AppError> {
        if raw_url.is_empty() {
            return Err(AppError::bad_request("URL is required"));
        }

        let original_url = raw_url.trim();
        if !validate_url(original_url) {
            debug!(url = %original_url, "Rejected invalid URL");
            return Err(AppError::bad_request("Invalid URL format"));
        }

        let store = self.store.acquire().await.map_err(storage_error)?;
        let code = self.allocate(&store, original_url).await?;
        let short_url = code.short_url(&self.settings.base_domain);

        metrics::counter!("shortener_links_created_total").increment(1);
        info!(code = %code, short_url = %short_url, "Created short URL");

        Ok(ShortenedLink {
            code,
            short_url,
            original_url: original_url.to_string(),
        })
    }

    /// Reserves a free code for `url`.
    async fn allocate(&self, store: &StoreHandle, url: &str) -> Result<ShortCode, AppError> {
        let attempts = self.settings.allocation_attempts;

        for attempt in 1..=attempts {
            let code = self.generator.generate();
            let reserved = store
                .set_nx_ex(code.mapping_key(), url, self.settings.ttl_seconds)
                .await
                .map_err(storage_error)?;

            if reserved {
                reset_clicks(store, &code).await;
                return Ok(code);
            }

            metrics::counter!("shortener_code_collisions_total").increment(1);
            debug!(code = %code, attempt, "Short code collision");
        }

        warn!(attempts, "Could not allocate a free short code");
        Err(AppError::service_unavailable("Could not allocate short code"))
    }
}

/// A reused code may still carry the counter of its expired predecessor.
async fn reset_clicks(store: &StoreHandle, code: &ShortCode) {
    if let Err(e) = store.del(&code.clicks_key()).await {
        warn!(code = %code, error = %e, "Failed to reset click counter");
    }
}

fn storage_error(e: StoreError) -> AppError {
    error!(error = %e, "Failed to store short URL");
    AppError::service_unavailable("Storage error")
}
