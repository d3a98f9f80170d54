//! Redis cache storage implementation
//!
//! Layout:
//! - `{prefix}:caches` - set of region names
//! - `{prefix}:cache:{name}` - hash of `"{METHOD} {url}"` to JSON-encoded response

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};

use crate::domain::cache::{AssetResponse, CacheRegion, CacheStorage, RequestKey};
use crate::domain::DomainError;

/// Configuration for Redis cache storage
#[derive(Debug, Clone)]
pub struct RedisCacheStorageConfig {
    /// Redis connection URL (e.g., "redis://127.0.0.1:6379")
    pub url: String,
    /// Key prefix for namespacing
    pub key_prefix: String,
}

impl Default for RedisCacheStorageConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            key_prefix: "asset-cache".to_string(),
        }
    }
}

impl RedisCacheStorageConfig {
    /// Creates a new configuration with the given URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Sets the key prefix
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }
}

#[derive(Debug, Clone)]
struct KeyLayout {
    prefix: String,
}

impl KeyLayout {
    fn names(&self) -> String {
        format!("{}:caches", self.prefix)
    }

    fn region(&self, name: &str) -> String {
        format!("{}:cache:{}", self.prefix, name)
    }
}

/// A cache region stored as a Redis hash
#[derive(Clone)]
pub struct RedisCacheRegion {
    name: String,
    hash_key: String,
    names_key: String,
    connection: ConnectionManager,
}

impl fmt::Debug for RedisCacheRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisCacheRegion")
            .field("name", &self.name)
            .field("hash_key", &self.hash_key)
            .field("connection", &"<ConnectionManager>")
            .finish()
    }
}

#[async_trait]
impl CacheRegion for RedisCacheRegion {
    fn name(&self) -> &str {
        &self.name
    }

    async fn lookup(&self, key: &RequestKey) -> Result<Option<AssetResponse>, DomainError> {
        let mut conn = self.connection.clone();

        let raw: Option<String> = conn
            .hget(&self.hash_key, key.to_storage_key())
            .await
            .map_err(|e| DomainError::cache(format!("Failed to read '{}': {}", key, e)))?;

        raw.map(|data| {
            serde_json::from_str(&data).map_err(|e| {
                DomainError::cache(format!("Failed to deserialize entry '{}': {}", key, e))
            })
        })
        .transpose()
    }

    async fn put_all(&self, entries: Vec<(RequestKey, AssetResponse)>) -> Result<(), DomainError> {
        let mut pipe = redis::pipe();
        pipe.atomic().sadd(&self.names_key, &self.name).ignore();

        for (key, response) in &entries {
            let data = serde_json::to_string(response).map_err(|e| {
                DomainError::cache(format!("Failed to serialize entry '{}': {}", key, e))
            })?;
            pipe.hset(&self.hash_key, key.to_storage_key(), data).ignore();
        }

        let mut conn = self.connection.clone();
        let _: () = pipe.query_async(&mut conn).await.map_err(|e| {
            DomainError::cache(format!("Failed to write cache '{}': {}", self.name, e))
        })?;

        Ok(())
    }

    async fn keys(&self) -> Result<Vec<RequestKey>, DomainError> {
        let mut conn = self.connection.clone();

        let fields: Vec<String> = conn.hkeys(&self.hash_key).await.map_err(|e| {
            DomainError::cache(format!("Failed to list cache '{}': {}", self.name, e))
        })?;

        let mut keys: Vec<RequestKey> = fields
            .iter()
            .filter_map(|field| RequestKey::from_storage_key(field))
            .collect();
        keys.sort();

        Ok(keys)
    }

    async fn delete(&self, key: &RequestKey) -> Result<bool, DomainError> {
        let mut conn = self.connection.clone();

        let removed: i32 = conn
            .hdel(&self.hash_key, key.to_storage_key())
            .await
            .map_err(|e| DomainError::cache(format!("Failed to delete '{}': {}", key, e)))?;

        Ok(removed > 0)
    }
}

/// Redis-backed set of named regions, persistent across restarts
#[derive(Clone)]
pub struct RedisCacheStorage {
    connection: ConnectionManager,
    layout: KeyLayout,
    config: RedisCacheStorageConfig,
}

impl fmt::Debug for RedisCacheStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisCacheStorage")
            .field("config", &self.config)
            .field("connection", &"<ConnectionManager>")
            .finish()
    }
}

impl RedisCacheStorage {
    /// Creates a new Redis storage connection
    pub async fn new(config: RedisCacheStorageConfig) -> Result<Self, DomainError> {
        let client = Client::open(config.url.as_str())
            .map_err(|e| DomainError::cache(format!("Failed to create Redis client: {}", e)))?;

        let connection = ConnectionManager::new(client)
            .await
            .map_err(|e| DomainError::cache(format!("Failed to connect to Redis: {}", e)))?;

        let layout = KeyLayout {
            prefix: config.key_prefix.clone(),
        };

        Ok(Self {
            connection,
            layout,
            config,
        })
    }

    fn region(&self, name: &str) -> RedisCacheRegion {
        RedisCacheRegion {
            name: name.to_string(),
            hash_key: self.layout.region(name),
            names_key: self.layout.names(),
            connection: self.connection.clone(),
        }
    }
}

#[async_trait]
impl CacheStorage for RedisCacheStorage {
    async fn open(&self, name: &str) -> Result<Arc<dyn CacheRegion>, DomainError> {
        let mut conn = self.connection.clone();

        let _: i32 = conn
            .sadd(self.layout.names(), name)
            .await
            .map_err(|e| DomainError::cache(format!("Failed to open cache '{}': {}", name, e)))?;

        Ok(Arc::new(self.region(name)))
    }

    async fn has(&self, name: &str) -> Result<bool, DomainError> {
        let mut conn = self.connection.clone();

        conn.sismember(self.layout.names(), name)
            .await
            .map_err(|e| DomainError::cache(format!("Failed to check cache '{}': {}", name, e)))
    }

    async fn keys(&self) -> Result<Vec<String>, DomainError> {
        let mut conn = self.connection.clone();

        let mut names: Vec<String> = conn
            .smembers(self.layout.names())
            .await
            .map_err(|e| DomainError::cache(format!("Failed to list caches: {}", e)))?;
        names.sort();

        Ok(names)
    }

    async fn delete(&self, name: &str) -> Result<bool, DomainError> {
        let mut conn = self.connection.clone();

        let (removed, _): (i32, i32) = redis::pipe()
            .atomic()
            .srem(self.layout.names(), name)
            .del(self.layout.region(name))
            .query_async(&mut conn)
            .await
            .map_err(|e| DomainError::cache(format!("Failed to delete cache '{}': {}", name, e)))?;

        Ok(removed > 0)
    }

    /// Reads the region hash directly; the name set is left untouched
    async fn match_in(
        &self,
        name: &str,
        key: &RequestKey,
    ) -> Result<Option<AssetResponse>, DomainError> {
        self.region(name).lookup(key).await
    }
}
