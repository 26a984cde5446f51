//! Short link resolution service.

use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::LinkSettings;
use crate::domain::entities::{LinkDetails, ShortCode};
use crate::domain::repositories::{KeyTtl, StoreError, StoreHandle};
use crate::error::AppError;
use crate::infrastructure::store::ConnectionManager;

/// Service for resolving short codes to their original URLs.
///
/// # Click Tracking
///
/// Every successful lookup increments `clicks:<code>`. Tracking is best-effort: a
/// failed increment is logged and the redirect still succeeds. The counter gets
/// the link TTL when it is created, so it never outlives its mapping by more
/// than one TTL.
pub struct RedirectService {
    store: Arc<ConnectionManager>,
    settings: LinkSettings,
}

impl RedirectService {
    /// Creates a new redirect service.
    pub fn new(store: Arc<ConnectionManager>, settings: LinkSettings) -> Self {
        Self { store, settings }
    }

    /// Resolves `code` to its original URL and counts the click.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code is malformed, was never written
    /// or has expired.
    /// Returns [`AppError::ServiceUnavailable`] if the store cannot be reached or
    /// the lookup fails.
    pub async fn resolve(&self, code: &str) -> Result<String, AppError> {
        let code = parse_code(code)?;

        let store = self.store.acquire().await.map_err(lookup_error)?;
        let original_url = store
            .get(code.mapping_key())
            .await
            .map_err(lookup_error)?
            .ok_or_else(|| not_found(&code))?;

        self.record_click(&store, &code).await;

        metrics::counter!("shortener_redirects_total").increment(1);
        info!(code = %code, "Redirecting to original URL");

        Ok(original_url)
    }

    /// Reads a link without counting a click.
    ///
    /// # Errors
    ///
    /// Same as [`Self::resolve`].
    pub async fn inspect(&self, code: &str) -> Result<LinkDetails, AppError> {
        let code = parse_code(code)?;

        let store = self.store.acquire().await.map_err(lookup_error)?;
        let original_url = store
            .get(code.mapping_key())
            .await
            .map_err(lookup_error)?
            .ok_or_else(|| not_found(&code))?;

        let ttl_seconds = match store.ttl(code.mapping_key()).await.map_err(lookup_error)? {
            KeyTtl::Expires(seconds) => Some(seconds),
            KeyTtl::Persistent | KeyTtl::Missing => None,
        };

        let clicks = store
            .get(&code.clicks_key())
            .await
            .map_err(lookup_error)?
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(0);

        Ok(LinkDetails {
            code: code.to_string(),
            original_url,
            ttl_seconds,
            clicks,
        })
    }

    /// Deletes a link and its click counter before the TTL runs out.
    ///
    /// Returns `false` if the code did not exist.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::ServiceUnavailable`] if the store cannot be reached.
    pub async fn remove(&self, code: &str) -> Result<bool, AppError> {
        let Some(code) = ShortCode::parse(code) else {
            return Ok(false);
        };

        let store = self.store.acquire().await.map_err(lookup_error)?;
        let removed = store.del(code.mapping_key()).await.map_err(lookup_error)?;
        store.del(&code.clicks_key()).await.map_err(lookup_error)?;

        if removed {
            info!(code = %code, "Short URL removed");
        }

        Ok(removed)
    }

    async fn record_click(&self, store: &StoreHandle, code: &ShortCode) {
        let key = code.clicks_key();

        match store.incr(&key).await {
            Ok(1) => {
                if let Err(e) = store.expire(&key, self.settings.ttl_seconds).await {
                    warn!(code = %code, error = %e, "Failed to set click counter TTL");
                }
            }
            Ok(clicks) => debug!(code = %code, clicks, "Click recorded"),
            Err(e) => {
                metrics::counter!("shortener_click_tracking_failures_total").increment(1);
                warn!(code = %code, error = %e, "Failed to record click");
            }
        }
    }
}

fn parse_code(raw: &str) -> Result<ShortCode, AppError> {
    ShortCode::parse(raw).ok_or_else(|| {
        debug!(code = %raw, "Malformed short code");
        AppError::not_found("Short URL not found")
    })
}

fn not_found(code: &ShortCode) -> AppError {
    debug!(code = %code, "Short code not found");
    AppError::not_found("Short URL not found")
}

fn lookup_error(e: StoreError) -> AppError {
    error!(error = %e, "Failed to look up short URL");
    AppError::service_unavailable("Service unavailable")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::ShortenService;
    use crate::domain::repositories::{KeyValueStore, MockKeyValueStore};
    use crate::infrastructure::store::{MemoryStore, MockStoreConnector};
    use std::time::Duration;

    struct Fixture {
        shortener: ShortenService,
        redirects: Arc<RedirectService>,
        store: MemoryStore,
    }

    fn fixture() -> Fixture {
        let store = MemoryStore::new();
        let manager = Arc::new(ConnectionManager::new(Arc::new(store.clone())));
        Fixture {
            shortener: ShortenService::new(manager.clone(), LinkSettings::default()),
            redirects: Arc::new(RedirectService::new(manager, LinkSettings::default())),
            store,
        }
    }

    fn manager_over(store: MockKeyValueStore) -> Arc<ConnectionManager> {
        let handle: StoreHandle = Arc::new(store);
        let mut connector = MockStoreConnector::new();
        connector
            .expect_connect()
            .returning(move || Ok(handle.clone()));
        Arc::new(ConnectionManager::new(Arc::new(connector)))
    }

    #[tokio::test]
    async fn test_resolve_returns_original_url() {
        let f = fixture();
        let link = f.shortener.shorten("https://example.com/a").await.unwrap();

        let url = f.redirects.resolve(link.code.as_str()).await.unwrap();

        assert_eq!(url, "https://example.com/a");
    }

    #[tokio::test]
    async fn test_resolve_counts_click() {
        let f = fixture();
        let link = f.shortener.shorten("https://example.com/a").await.unwrap();

        f.redirects.resolve(link.code.as_str()).await.unwrap();
        assert_eq!(
            f.store.get(&link.code.clicks_key()).await.unwrap().as_deref(),
            Some("1")
        );

        f.redirects.resolve(link.code.as_str()).await.unwrap();
        assert_eq!(
            f.store.get(&link.code.clicks_key()).await.unwrap().as_deref(),
            Some("2")
        );
    }

    #[tokio::test]
    async fn test_click_counter_gets_link_ttl() {
        let f = fixture();
        let link = f.shortener.shorten("https://example.com").await.unwrap();

        f.redirects.resolve(link.code.as_str()).await.unwrap();

        assert_eq!(
            f.store.ttl(&link.code.clicks_key()).await.unwrap(),
            KeyTtl::Expires(86_400)
        );
    }

    #[tokio::test]
    async fn test_resolve_unknown_code() {
        let f = fixture();

        let result = f.redirects.resolve("doesnotexist").await;

        assert_eq!(
            result.unwrap_err(),
            AppError::not_found("Short URL not found")
        );
        assert!(f.store.is_empty());
    }

    #[tokio::test]
    async fn test_resolve_malformed_code_skips_store() {
        let mut connector = MockStoreConnector::new();
        connector.expect_connect().times(0);
        let manager = Arc::new(ConnectionManager::new(Arc::new(connector)));
        let service = RedirectService::new(manager, LinkSettings::default());

        for code in ["", "clicks:abc123", "abc-123", "abc%20"] {
            let result = service.resolve(code).await;
            assert_eq!(
                result.unwrap_err(),
                AppError::not_found("Short URL not found")
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_resolve_after_expiry() {
        let f = fixture();
        let link = f.shortener.shorten("https://example.com").await.unwrap();

        tokio::time::advance(Duration::from_secs(86_399)).await;
        assert!(f.redirects.resolve(link.code.as_str()).await.is_ok());

        tokio::time::advance(Duration::from_secs(1)).await;
        let result = f.redirects.resolve(link.code.as_str()).await;
        assert_eq!(
            result.unwrap_err(),
            AppError::not_found("Short URL not found")
        );
    }

    #[tokio::test]
    async fn test_click_failure_does_not_fail_redirect() {
        let mut store = MockKeyValueStore::new();
        store.expect_ping().returning(|| Ok(()));
        store
            .expect_get()
            .times(1)
            .returning(|_| Ok(Some("https://example.com".to_string())));
        store
            .expect_incr()
            .times(1)
            .returning(|_| Err(StoreError::Timeout(Duration::from_secs(2))));

        let service = RedirectService::new(manager_over(store), LinkSettings::default());

        let url = service.resolve("abc123").await.unwrap();
        assert_eq!(url, "https://example.com");
    }

    #[tokio::test]
    async fn test_counter_ttl_failure_does_not_fail_redirect() {
        let mut store = MockKeyValueStore::new();
        store.expect_ping().returning(|| Ok(()));
        store
            .expect_get()
            .returning(|_| Ok(Some("https://example.com".to_string())));
        store.expect_incr().returning(|_| Ok(1));
        store
            .expect_expire()
            .withf(|key, ttl| key == "clicks:abc123" && *ttl == 86_400)
            .times(1)
            .returning(|_, _| Err(StoreError::Command("ERR".to_string())));

        let service = RedirectService::new(manager_over(store), LinkSettings::default());

        assert!(service.resolve("abc123").await.is_ok());
    }

    #[tokio::test]
    async fn test_lookup_error() {
        let mut store = MockKeyValueStore::new();
        store.expect_ping().returning(|| Ok(()));
        store
            .expect_get()
            .returning(|_| Err(StoreError::Command("LOADING".to_string())));
        store.expect_incr().times(0);

        let service = RedirectService::new(manager_over(store), LinkSettings::default());

        let result = service.resolve("abc123").await;
        assert_eq!(
            result.unwrap_err(),
            AppError::service_unavailable("Service unavailable")
        );
    }

    #[tokio::test]
    async fn test_store_unavailable() {
        let mut connector = MockStoreConnector::new();
        connector
            .expect_connect()
            .returning(|| Err(StoreError::Connection("connection refused".to_string())));
        let manager = Arc::new(ConnectionManager::new(Arc::new(connector)));
        let service = RedirectService::new(manager, LinkSettings::default());

        let result = service.resolve("abc123").await;
        assert_eq!(
            result.unwrap_err(),
            AppError::service_unavailable("Service unavailable")
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_resolves_count_every_click() {
        let f = fixture();
        let link = f.shortener.shorten("https://example.com").await.unwrap();

        let mut tasks = tokio::task::JoinSet::new();
        for _ in 0..50 {
            let redirects = f.redirects.clone();
            let code = link.code.to_string();
            tasks.spawn(async move { redirects.resolve(&code).await });
        }
        while let Some(result) = tasks.join_next().await {
            assert!(result.unwrap().is_ok());
        }

        assert_eq!(
            f.store.get(&link.code.clicks_key()).await.unwrap().as_deref(),
            Some("50")
        );
    }

    #[tokio::test]
    async fn test_inspect_does_not_count_click() {
        let f = fixture();
        let link = f.shortener.shorten("https://example.com/i").await.unwrap();
        f.redirects.resolve(link.code.as_str()).await.unwrap();

        let details = f.redirects.inspect(link.code.as_str()).await.unwrap();
        let again = f.redirects.inspect(link.code.as_str()).await.unwrap();

        assert_eq!(details.original_url, "https://example.com/i");
        assert_eq!(details.clicks, 1);
        assert_eq!(details.ttl_seconds, Some(86_400));
        assert_eq!(again.clicks, 1);
    }

    #[tokio::test]
    async fn test_remove_deletes_mapping_and_counter() {
        let f = fixture();
        let link = f.shortener.shorten("https://example.com/r").await.unwrap();
        f.redirects.resolve(link.code.as_str()).await.unwrap();

        assert!(f.redirects.remove(link.code.as_str()).await.unwrap());

        assert!(f.store.is_empty());
        assert!(matches!(
            f.redirects.resolve(link.code.as_str()).await,
            Err(AppError::NotFound { .. })
        ));
        assert!(!f.redirects.remove(link.code.as_str()).await.unwrap());
    }

    #[tokio::test]
    async fn test_remove_malformed_code() {
        let f = fixture();

        assert!(!f.redirects.remove("clicks:abc").await.unwrap());
    }

    #[tokio::test]
    async fn test_inspect_unknown_code() {
        let f = fixture();

        let result = f.redirects.inspect("nope42").await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }
}
