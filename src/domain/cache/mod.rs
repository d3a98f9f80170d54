//! Cache domain - named cache regions, request identity and versioning

mod entity;
mod key;
mod manifest;
mod repository;
mod version;

pub use entity::{AssetRequest, AssetResponse};
pub use key::RequestKey;
pub use manifest::Manifest;
pub use repository::{CacheRegion, CacheRegionExt, CacheStorage};
pub use version::CacheVersion;

#[cfg(test)]
pub use repository::mock::{MockCacheRegion, MockCacheStorage};
