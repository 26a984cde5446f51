//! Application layer services implementing business logic.
//!
//! Services orchestrate validation, code generation and store access, and
//! provide a clean API for HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::shorten_service::ShortenService`] - Short link creation
//! - [`services::redirect_service::RedirectService`] - Resolution and click tracking

pub mod services;
