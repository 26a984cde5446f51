#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use shortly::application::services::LinkSettings;
use shortly::domain::repositories::{StoreError, StoreHandle, StoreResult};
use shortly::infrastructure::store::{ConnectionManager, MemoryStore, StoreConnector};
use shortly::routes::router;
use shortly::state::AppState;
use std::sync::Arc;

/// Connector for a store that refuses every connection.
pub struct UnreachableStore;

#[async_trait]
impl StoreConnector for UnreachableStore {
    async fn connect(&self) -> StoreResult<StoreHandle> {
        Err(StoreError::Connection("connection refused".to_string()))
    }
}

/// State over a fresh in-memory store. The returned store shares its data with
/// the state, so tests can inspect what handlers wrote.
pub fn create_test_state() -> (AppState, MemoryStore) {
    let store = MemoryStore::new();
    let manager = Arc::new(ConnectionManager::new(Arc::new(store.clone())));

    (AppState::new(manager, LinkSettings::default()), store)
}

pub fn create_unavailable_state() -> AppState {
    let manager = Arc::new(ConnectionManager::new(Arc::new(UnreachableStore)));

    AppState::new(manager, LinkSettings::default())
}

/// Full application router over a fresh in-memory store.
pub fn create_test_app() -> (Router, MemoryStore) {
    let (state, store) = create_test_state();
    (router(state), store)
}
