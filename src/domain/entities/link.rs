//! Link entities returned by the application services.

use serde::Serialize;

use super::ShortCode;

/// A freshly created short link.
#[derive(Debug, Clone)]
pub struct ShortenedLink {
    pub code: ShortCode,
    pub short_url: String,
    pub original_url: String,
}

/// Read-only view of a stored link, used by the admin tooling.
///
/// `ttl_seconds` is `None` when the store reports no expiry for the key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkDetails {
    pub code: String,
    pub original_url: String,
    pub ttl_seconds: Option<u64>,
    pub clicks: i64,
}
