//! Application state shared by the HTTP handlers

use std::sync::Arc;

use url::Url;

use crate::domain::cache::CacheStorage;
use crate::domain::lifecycle::CacheLifecycleManager;

#[derive(Clone)]
pub struct AppState {
    pub lifecycle: Arc<CacheLifecycleManager>,
    pub storage: Arc<dyn CacheStorage>,
    /// Upstream origin incoming paths are mapped onto
    pub origin: Url,
}

impl AppState {
    pub fn new(
        lifecycle: Arc<CacheLifecycleManager>,
        storage: Arc<dyn CacheStorage>,
        origin: Url,
    ) -> Self {
        Self {
            lifecycle,
            storage,
            origin,
        }
    }
}
