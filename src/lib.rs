//! Asset Cache Proxy
//!
//! A caching reverse proxy for a static site with versioned cache regions:
//! - Install: pre-populates the current region from a fixed asset manifest
//! - Activate: deletes regions left behind by earlier versions
//! - Fetch: serves stored responses first, falling back to the network

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use api::AppState;
use domain::{CacheLifecycleManager, CacheStorage, NetworkFetcher};
use infrastructure::cache::CacheStorageFactory;
use infrastructure::network::HttpFetcher;
use tracing::info;

/// Wires storage, network access and the lifecycle manager from configuration
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let settings = config::assets::lifecycle_settings(&config.upstream.origin)?;
    let origin = settings.scope.clone();

    let storage: Arc<dyn CacheStorage> =
        CacheStorageFactory::create(&config.storage.to_factory_config()).await?;
    info!(backend = %config.storage.backend, "cache storage ready");

    let fetcher: Arc<dyn NetworkFetcher> = Arc::new(HttpFetcher::with_timeout(
        Duration::from_secs(config.upstream.timeout_secs),
    )?);

    let lifecycle = Arc::new(CacheLifecycleManager::new(
        storage.clone(),
        fetcher,
        settings,
    ));

    Ok(AppState::new(lifecycle, storage, origin))
}
