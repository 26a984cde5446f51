//! Core domain entities representing the business data model.
//!
//! # Entity Types
//!
//! - [`ShortCode`] - An alphanumeric code addressing a stored URL
//! - [`ShortenedLink`] - The result of shortening a URL
//! - [`LinkDetails`] - A stored link with its remaining TTL and click count

pub mod link;
pub mod short_code;

pub use link::{LinkDetails, ShortenedLink};
pub use short_code::ShortCode;
