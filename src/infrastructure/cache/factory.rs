//! Cache storage factory for runtime selection

use std::sync::Arc;

use serde::Deserialize;

use crate::domain::cache::CacheStorage;
use crate::domain::DomainError;

use super::in_memory::InMemoryCacheStorage;
use super::redis::{RedisCacheStorage, RedisCacheStorageConfig};

/// Supported storage backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// Process-local storage using moka
    #[default]
    InMemory,
    /// Persistent storage in Redis
    Redis,
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackend::InMemory => write!(f, "in_memory"),
            StorageBackend::Redis => write!(f, "redis"),
        }
    }
}

impl std::str::FromStr for StorageBackend {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "in_memory" | "inmemory" | "memory" => Ok(StorageBackend::InMemory),
            "redis" => Ok(StorageBackend::Redis),
            _ => Err(DomainError::configuration(format!(
                "Unknown storage backend: {}. Valid backends: in_memory, redis",
                s
            ))),
        }
    }
}

/// Configuration for the storage factory
#[derive(Debug, Clone, Default)]
pub struct CacheStorageConfig {
    pub backend: StorageBackend,
    /// Redis URL (required for the Redis backend)
    pub redis_url: Option<String>,
    /// Key prefix for namespacing Redis keys
    pub key_prefix: Option<String>,
}

impl CacheStorageConfig {
    /// Creates a new configuration for in-memory storage
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Creates a new configuration for Redis storage
    pub fn redis(url: impl Into<String>) -> Self {
        Self {
            backend: StorageBackend::Redis,
            redis_url: Some(url.into()),
            key_prefix: None,
        }
    }

    /// Sets the key prefix
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }
}

/// Creates cache storage backends
pub struct CacheStorageFactory;

impl CacheStorageFactory {
    pub async fn create(config: &CacheStorageConfig) -> Result<Arc<dyn CacheStorage>, DomainError> {
        match config.backend {
            StorageBackend::InMemory => Ok(Arc::new(InMemoryCacheStorage::new())),
            StorageBackend::Redis => {
                let url = config.redis_url.as_ref().ok_or_else(|| {
                    DomainError::configuration("Redis URL is required for the redis backend")
                })?;

                let mut redis_config = RedisCacheStorageConfig::new(url);

                if let Some(prefix) = &config.key_prefix {
                    redis_config = redis_config.with_key_prefix(prefix);
                }

                Ok(Arc::new(RedisCacheStorage::new(redis_config).await?))
            }
        }
    }
}
