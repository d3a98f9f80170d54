//! Cache infrastructure - Cache storage backends

mod factory;
mod in_memory;
mod redis;

pub use factory::{CacheStorageConfig, CacheStorageFactory, StorageBackend};
pub use in_memory::{InMemoryCacheRegion, InMemoryCacheStorage};
pub use self::redis::{RedisCacheRegion, RedisCacheStorage, RedisCacheStorageConfig};
