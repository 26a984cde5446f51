//! DTOs for link shortening endpoint.

use serde::{Deserialize, Serialize};

use crate::domain::entities::ShortenedLink;

/// Request to shorten a URL.
///
/// `url` is optional so that a body without it reaches the service and gets the
/// same `URL is required` answer as an empty string.
#[derive(Debug, Deserialize)]
pub struct ShortenRequest {
    #[serde(default)]
    pub url: Option<String>,
}

/// A created short link.
#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub short_url: String,
    pub original_url: String,
    pub code: String,
}

impl From<ShortenedLink> for ShortenResponse {
    fn from(link: ShortenedLink) -> Self {
        Self {
            short_url: link.short_url,
            original_url: link.original_url,
            code: link.code.to_string(),
        }
    }
}
