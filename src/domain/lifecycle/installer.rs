//! Install phase - populates the current cache region

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use url::Url;

use crate::domain::cache::{CacheRegionExt, CacheStorage, CacheVersion, Manifest};
use crate::domain::network::NetworkFetcher;
use crate::domain::DomainError;

/// Outcome of a successful install
#[derive(Debug, Clone, Serialize)]
pub struct InstallReport {
    pub cache_name: String,
    pub entries: usize,
    pub installed_at: DateTime<Utc>,
}

/// Opens the current region and stores every manifest entry in it
#[derive(Debug, Clone)]
pub struct Installer {
    storage: Arc<dyn CacheStorage>,
    fetcher: Arc<dyn NetworkFetcher>,
    version: CacheVersion,
    manifest: Manifest,
    scope: Url,
}

impl Installer {
    pub fn new(
        storage: Arc<dyn CacheStorage>,
        fetcher: Arc<dyn NetworkFetcher>,
        version: CacheVersion,
        manifest: Manifest,
        scope: Url,
    ) -> Self {
        Self {
            storage,
            fetcher,
            version,
            manifest,
            scope,
        }
    }

    /// Runs the install phase. Any error means this version must not be activated.
    pub async fn install(&self) -> Result<InstallReport, DomainError> {
        let cache_name = self.version.cache_name();
        info!(cache = %cache_name, assets = self.manifest.len(), "installing cache");

        let requests = self
            .manifest
            .resolve(&self.scope)
            .map_err(|e| DomainError::population(cache_name, e.to_string()))?;

        let region = self
            .storage
            .open(cache_name)
            .await
            .map_err(|e| DomainError::population(cache_name, e.to_string()))?;

        let entries = region
            .add_all(self.fetcher.as_ref(), &requests)
            .await
            .inspect_err(|e| warn!(cache = %cache_name, error = %e, "cache population failed"))?;

        info!(cache = %cache_name, entries, "cache installed");

        Ok(InstallReport {
            cache_name: cache_name.to_string(),
            entries,
            installed_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cache::{MockCacheStorage, RequestKey};
    use crate::domain::network::mock::MockNetworkFetcher;

    fn scope() -> Url {
        Url::parse("https://example.com/").unwrap()
    }

    fn installer(
        storage: Arc<MockCacheStorage>,
        fetcher: Arc<MockNetworkFetcher>,
        entries: &[&str],
    ) -> Installer {
        Installer::new(
            storage,
            fetcher,
            CacheVersion::new("APP-", "v1").unwrap(),
            Manifest::new(entries.iter().copied()).unwrap(),
            scope(),
        )
    }

    fn site() -> MockNetworkFetcher {
        MockNetworkFetcher::new()
            .with_response("https://example.com/index.html", 200, "<html>")
            .with_response("https://example.com/style.css", 200, "body {}")
    }

    #[tokio::test]
    async fn test_install_populates_every_manifest_entry() {
        let storage = Arc::new(MockCacheStorage::new());
        let fetcher = Arc::new(site());
        let installer = installer(
            storage.clone(),
            fetcher.clone(),
            &["/index.html", "/style.css"],
        );

        let report = installer.install().await.unwrap();

        assert_eq!(report.cache_name, "APP-v1");
        assert_eq!(report.entries, 2);
        assert_eq!(storage.names(), vec!["APP-v1".to_string()]);
        assert_eq!(storage.entry_count("APP-v1"), Some(2));

        for url in ["https://example.com/index.html", "https://example.com/style.css"] {
            let stored = storage
                .match_in("APP-v1", &RequestKey::get(url))
                .await
                .unwrap();
            assert!(stored.is_some(), "{} should be cached", url);
        }
    }

    #[tokio::test]
    async fn test_install_twice_is_idempotent() {
        let storage = Arc::new(MockCacheStorage::new());
        let fetcher = Arc::new(site());
        let installer = installer(
            storage.clone(),
            fetcher.clone(),
            &["/index.html", "/style.css"],
        );

        installer.install().await.unwrap();
        let first = storage
            .match_in("APP-v1", &RequestKey::get("https://example.com/index.html"))
            .await
            .unwrap();

        installer.install().await.unwrap();
        let second = storage
            .match_in("APP-v1", &RequestKey::get("https://example.com/index.html"))
            .await
            .unwrap();

        assert_eq!(storage.entry_count("APP-v1"), Some(2));
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_install_fails_when_an_entry_is_missing() {
        let storage = Arc::new(MockCacheStorage::new());
        let fetcher = Arc::new(site());
        let installer = installer(
            storage.clone(),
            fetcher,
            &["/index.html", "/missing.js"],
        );

        let result = installer.install().await;

        match result {
            Err(DomainError::Population { cache, message }) => {
                assert_eq!(cache, "APP-v1");
                assert!(message.contains("404"));
            }
            other => panic!("expected population failure, got {:?}", other),
        }
        assert_eq!(storage.entry_count("APP-v1"), Some(0));
    }

    #[tokio::test]
    async fn test_install_fails_on_network_error() {
        let storage = Arc::new(MockCacheStorage::new());
        let fetcher = Arc::new(site().with_failure("https://example.com/style.css"));
        let installer = installer(storage, fetcher, &["/index.html", "/style.css"]);

        let result = installer.install().await;
        assert!(matches!(result, Err(DomainError::Population { .. })));
    }

    #[tokio::test]
    async fn test_install_fails_when_storage_is_unavailable() {
        let storage = Arc::new(MockCacheStorage::new().with_error("storage offline"));
        let fetcher = Arc::new(site());
        let installer = installer(storage, fetcher.clone(), &["/index.html"]);

        let result = installer.install().await;

        assert!(matches!(result, Err(DomainError::Population { .. })));
        assert_eq!(fetcher.call_count(), 0);
    }

    #[tokio::test]
    async fn test_install_fails_on_duplicate_entries() {
        let storage = Arc::new(MockCacheStorage::new());
        let fetcher = Arc::new(site());
        let installer = installer(storage, fetcher.clone(), &["/index.html", "./index.html"]);

        let result = installer.install().await;

        assert!(matches!(result, Err(DomainError::Population { .. })));
        assert_eq!(fetcher.call_count(), 0);
    }
}
