//! Lifecycle manager wiring the install, activate and fetch handlers

use std::sync::Arc;

use url::Url;

use crate::domain::cache::{AssetRequest, CacheStorage, CacheVersion, Manifest};
use crate::domain::network::NetworkFetcher;
use crate::domain::DomainError;

use super::installer::{InstallReport, Installer};
use super::interceptor::{InterceptedResponse, RequestInterceptor};
use super::reconciler::{ActivationReport, Reconciler};

/// Build-time settings of one deployed version
#[derive(Debug, Clone)]
pub struct LifecycleSettings {
    pub version: CacheVersion,
    pub manifest: Manifest,
    /// Base URL manifest entries are resolved against
    pub scope: Url,
}

/// Reacts to the three lifecycle events.
///
/// The host must await `on_install` before calling `on_activate`, and
/// `on_activate` before routing requests to `on_fetch`. Each returned
/// future is the completion signal of its event.
#[derive(Debug, Clone)]
pub struct CacheLifecycleManager {
    installer: Installer,
    reconciler: Reconciler,
    interceptor: RequestInterceptor,
    version: CacheVersion,
}

impl CacheLifecycleManager {
    pub fn new(
        storage: Arc<dyn CacheStorage>,
        fetcher: Arc<dyn NetworkFetcher>,
        settings: LifecycleSettings,
    ) -> Self {
        let LifecycleSettings {
            version,
            manifest,
            scope,
        } = settings;

        Self {
            installer: Installer::new(
                storage.clone(),
                fetcher.clone(),
                version.clone(),
                manifest,
                scope,
            ),
            reconciler: Reconciler::new(storage.clone(), version.clone()),
            interceptor: RequestInterceptor::new(storage, fetcher, version.clone()),
            version,
        }
    }

    pub fn version(&self) -> &CacheVersion {
        &self.version
    }

    pub async fn on_install(&self) -> Result<InstallReport, DomainError> {
        self.installer.install().await
    }

    pub async fn on_activate(&self) -> Result<ActivationReport, DomainError> {
        self.reconciler.activate().await
    }

    pub async fn on_fetch(&self, request: &AssetRequest) -> Result<InterceptedResponse, DomainError> {
        self.interceptor.handle(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cache::MockCacheStorage;
    use crate::domain::lifecycle::ResponseSource;
    use crate::domain::network::mock::MockNetworkFetcher;

    fn settings(version: &str) -> LifecycleSettings {
        LifecycleSettings {
            version: CacheVersion::new("APP-", version).unwrap(),
            manifest: Manifest::new(["/index.html", "/style.css"]).unwrap(),
            scope: Url::parse("https://example.com/").unwrap(),
        }
    }

    fn site() -> Arc<MockNetworkFetcher> {
        Arc::new(
            MockNetworkFetcher::new()
                .with_response("https://example.com/index.html", 200, "<html>")
                .with_response("https://example.com/style.css", 200, "body {}")
                .with_response("https://example.com/new.js", 200, "let x;"),
        )
    }

    #[tokio::test]
    async fn test_version_upgrade_end_to_end() {
        let storage = Arc::new(MockCacheStorage::new().with_region("OTHER-v1"));
        let fetcher = site();

        let v1 = CacheLifecycleManager::new(storage.clone(), fetcher.clone(), settings("v1"));
        v1.on_install().await.unwrap();
        v1.on_activate().await.unwrap();

        let v2 = CacheLifecycleManager::new(storage.clone(), fetcher.clone(), settings("v2"));
        v2.on_install().await.unwrap();
        let report = v2.on_activate().await.unwrap();

        assert_eq!(report.deleted, vec!["APP-v1".to_string()]);
        assert_eq!(
            storage.names(),
            vec!["APP-v2".to_string(), "OTHER-v1".to_string()]
        );
        assert_eq!(storage.entry_count("APP-v2"), Some(2));
    }

    #[tokio::test]
    async fn test_fetch_after_activation() {
        let storage = Arc::new(MockCacheStorage::new());
        let fetcher = site();
        let manager = CacheLifecycleManager::new(storage, fetcher.clone(), settings("v1"));

        manager.on_install().await.unwrap();
        manager.on_activate().await.unwrap();
        let calls_after_install = fetcher.call_count();

        let cached = manager
            .on_fetch(&AssetRequest::get("https://example.com/index.html"))
            .await
            .unwrap();
        assert_eq!(cached.source, ResponseSource::Cache);
        assert_eq!(fetcher.call_count(), calls_after_install);

        let live = manager
            .on_fetch(&AssetRequest::get("https://example.com/new.js"))
            .await
            .unwrap();
        assert_eq!(live.source, ResponseSource::Network);
        assert_eq!(fetcher.call_count(), calls_after_install + 1);
    }
}
