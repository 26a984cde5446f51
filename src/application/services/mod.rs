//! Business logic services for the application layer.

pub mod redirect_service;
pub mod shorten_service;

pub use redirect_service::RedirectService;
pub use shorten_service::ShortenService;

use crate::utils::code_generator::DEFAULT_CODE_LENGTH;

/// Link policy shared by the services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSettings {
    /// Public domain (or base URL) used to compose short URLs.
    pub base_domain: String,
    /// Lifetime of a mapping, also applied to its click counter.
    pub ttl_seconds: u64,
    /// Number of symbols in a generated code.
    pub code_length: usize,
    /// How many codes are tried before giving up on collisions.
    pub allocation_attempts: usize,
}

impl Default for LinkSettings {
    fn default() -> Self {
        Self {
            base_domain: "short.ly".to_string(),
            ttl_seconds: 86_400,
            code_length: DEFAULT_CODE_LENGTH,
            allocation_attempts: 5,
        }
    }
}
