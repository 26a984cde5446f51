//! HTTP middleware for request processing.
//!
//! Provides observability, CORS and panic recovery layers.

pub mod catch_panic;
pub mod cors;
pub mod tracing;
