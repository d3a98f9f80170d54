//! Network domain - live fetch capability

use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::cache::{AssetRequest, AssetResponse};
use crate::domain::DomainError;

/// Performs a live network fetch.
///
/// Any HTTP status is a successful fetch; only transport-level failures
/// are reported as errors.
#[async_trait]
pub trait NetworkFetcher: Send + Sync + Debug {
    async fn fetch(&self, request: &AssetRequest) -> Result<AssetResponse, DomainError>;
}
