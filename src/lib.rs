//! # Shortly
//!
//! An ephemeral URL shortener built with Axum and Redis.
//!
//! Every short link lives for a fixed TTL (24 hours by default) and counts its
//! redirects. There is no database: links and click counters are plain keys in
//! a shared key-value store, so any number of stateless instances can serve
//! the same links.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - Short codes, links and the key-value store contract
//! - **Application Layer** ([`application`]) - Shortening and redirect services
//! - **Infrastructure Layer** ([`infrastructure`]) - Redis and in-memory stores, connection manager
//! - **API Layer** ([`api`]) - REST API handlers, DTOs, and middleware
//!
//! ## Quick Start
//!
//! ```bash
//! export REDIS_URL="redis://localhost:6379"
//! cargo run
//!
//! curl -X POST localhost:5000/shorten -H 'content-type: application/json' \
//!      -d '{"url": "https://example.com"}'
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{LinkSettings, RedirectService, ShortenService};
    pub use crate::domain::entities::{LinkDetails, ShortCode, ShortenedLink};
    pub use crate::domain::repositories::{KeyValueStore, StoreError};
    pub use crate::error::AppError;
    pub use crate::infrastructure::store::{ConnectionManager, MemoryStore, StoreConnector};
    pub use crate::state::AppState;
}
