//! Shared application state injected into HTTP handlers.

use std::sync::Arc;

use crate::application::services::{LinkSettings, RedirectService, ShortenService};
use crate::infrastructure::store::ConnectionManager;

/// State shared by all handlers.
///
/// Cheap to clone; every field is reference-counted.
#[derive(Clone)]
pub struct AppState {
    pub shorten_service: Arc<ShortenService>,
    pub redirect_service: Arc<RedirectService>,
    pub store: Arc<ConnectionManager>,
    /// Public domain reported by the health endpoint.
    pub base_domain: Arc<str>,
}

impl AppState {
    /// Builds the services on top of a shared connection manager.
    pub fn new(store: Arc<ConnectionManager>, settings: LinkSettings) -> Self {
        Self {
            shorten_service: Arc::new(ShortenService::new(store.clone(), settings.clone())),
            redirect_service: Arc::new(RedirectService::new(store.clone(), settings.clone())),
            base_domain: Arc::from(settings.base_domain),
            store,
        }
    }
}
