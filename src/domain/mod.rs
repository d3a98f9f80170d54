//! Domain layer - Cache lifecycle logic and the capabilities it depends on

pub mod cache;
pub mod error;
pub mod lifecycle;
pub mod network;

pub use cache::{
    AssetRequest, AssetResponse, CacheRegion, CacheRegionExt, CacheStorage, CacheVersion,
    Manifest, RequestKey,
};
pub use error::DomainError;
pub use lifecycle::{
    ActivationReport, CacheLifecycleManager, DeletionFailure, InstallReport, InterceptedResponse,
    LifecycleSettings, ResponseSource,
};
pub use network::NetworkFetcher;
