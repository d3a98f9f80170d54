//! In-memory cache storage using moka

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use moka::future::Cache as MokaCache;
use tokio::sync::RwLock;

use crate::domain::cache::{AssetResponse, CacheRegion, CacheStorage, RequestKey};
use crate::domain::DomainError;

/// A cache region backed by an unbounded moka cache.
///
/// No capacity limit and no TTL are configured, so entries are never
/// evicted; they only disappear when the region is deleted.
#[derive(Debug)]
pub struct InMemoryCacheRegion {
    name: String,
    entries: MokaCache<RequestKey, AssetResponse>,
}

impl InMemoryCacheRegion {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            entries: MokaCache::builder().name(name).build(),
        }
    }
}

#[async_trait]
impl CacheRegion for InMemoryCacheRegion {
    fn name(&self) -> &str {
        &self.name
    }

    async fn lookup(&self, key: &RequestKey) -> Result<Option<AssetResponse>, DomainError> {
        Ok(self.entries.get(key).await)
    }

    async fn put_all(&self, entries: Vec<(RequestKey, AssetResponse)>) -> Result<(), DomainError> {
        for (key, response) in entries {
            self.entries.insert(key, response).await;
        }

        Ok(())
    }

    async fn keys(&self) -> Result<Vec<RequestKey>, DomainError> {
        self.entries.run_pending_tasks().await;

        let mut keys: Vec<RequestKey> = self
            .entries
            .iter()
            .map(|(key, _)| (*key).clone())
            .collect();
        keys.sort();

        Ok(keys)
    }

    async fn delete(&self, key: &RequestKey) -> Result<bool, DomainError> {
        Ok(self.entries.remove(key).await.is_some())
    }
}

/// Process-local set of named regions
#[derive(Debug, Default)]
pub struct InMemoryCacheStorage {
    regions: RwLock<BTreeMap<String, Arc<InMemoryCacheRegion>>>,
}

impl InMemoryCacheStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStorage for InMemoryCacheStorage {
    async fn open(&self, name: &str) -> Result<Arc<dyn CacheRegion>, DomainError> {
        if let Some(region) = self.regions.read().await.get(name) {
            return Ok(region.clone());
        }

        let mut regions = self.regions.write().await;
        let region = regions
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(InMemoryCacheRegion::new(name)))
            .clone();

        Ok(region)
    }

    async fn has(&self, name: &str) -> Result<bool, DomainError> {
        Ok(self.regions.read().await.contains_key(name))
    }

    async fn keys(&self) -> Result<Vec<String>, DomainError> {
        Ok(self.regions.read().await.keys().cloned().collect())
    }

    async fn delete(&self, name: &str) -> Result<bool, DomainError> {
        let removed = self.regions.write().await.remove(name);

        match removed {
            Some(region) => {
                region.entries.invalidate_all();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn match_in(
        &self,
        name: &str,
        key: &RequestKey,
    ) -> Result<Option<AssetResponse>, DomainError> {
        let region = self.regions.read().await.get(name).cloned();

        match region {
            Some(region) => region.lookup(key).await,
            None => Ok(None),
        }
    }
}
