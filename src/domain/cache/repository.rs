//! Cache storage traits

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::try_join_all;

use crate::domain::network::NetworkFetcher;
use crate::domain::DomainError;

use super::entity::{AssetRequest, AssetResponse};
use super::key::RequestKey;

/// A named store mapping request identity to a stored response
#[async_trait]
pub trait CacheRegion: Send + Sync + Debug {
    /// Name this region was opened with
    fn name(&self) -> &str;

    /// Looks up the stored response for a request identity
    async fn lookup(&self, key: &RequestKey) -> Result<Option<AssetResponse>, DomainError>;

    /// Stores a single response, replacing any previous entry
    async fn put(&self, key: RequestKey, response: AssetResponse) -> Result<(), DomainError> {
        self.put_all(vec![(key, response)]).await
    }

    /// Stores a batch of responses; either all entries are written or none
    async fn put_all(&self, entries: Vec<(RequestKey, AssetResponse)>) -> Result<(), DomainError>;

    /// Lists the identities of all stored entries
    async fn keys(&self) -> Result<Vec<RequestKey>, DomainError>;

    /// Removes a single entry
    async fn delete(&self, key: &RequestKey) -> Result<bool, DomainError>;
}

/// The set of named cache regions
#[async_trait]
pub trait CacheStorage: Send + Sync + Debug {
    /// Opens the named region, creating it if absent
    async fn open(&self, name: &str) -> Result<Arc<dyn CacheRegion>, DomainError>;

    /// Checks whether a region with this name exists
    async fn has(&self, name: &str) -> Result<bool, DomainError>;

    /// Lists the names of all existing regions
    async fn keys(&self) -> Result<Vec<String>, DomainError>;

    /// Deletes the named region with all its entries
    async fn delete(&self, name: &str) -> Result<bool, DomainError>;

    /// Looks up a request in the named region.
    ///
    /// A missing region is a miss. Implementations must never create the
    /// region here, so a concurrent `delete` cannot be undone by a read.
    async fn match_in(
        &self,
        name: &str,
        key: &RequestKey,
    ) -> Result<Option<AssetResponse>, DomainError>;
}

/// Extension trait providing network-backed population
pub trait CacheRegionExt: CacheRegion {
    /// Fetches every request and stores all responses in one batch.
    ///
    /// Fails without writing anything if any fetch fails or answers with a
    /// non-2xx status. Returns the number of stored entries.
    fn add_all<'a>(
        &'a self,
        fetcher: &'a dyn NetworkFetcher,
        requests: &'a [AssetRequest],
    ) -> impl std::future::Future<Output = Result<usize, DomainError>> + Send {
        async move {
            let fetches = requests.iter().map(|request| async move {
                let response = fetcher
                    .fetch(request)
                    .await
                    .map_err(|e| DomainError::population(self.name(), e.to_string()))?;

                if !response.is_success() {
                    return Err(DomainError::population(
                        self.name(),
                        format!("HTTP {} for {}", response.status, request.url),
                    ));
                }

                Ok::<_, DomainError>((request.key(), response))
            });

            let entries = try_join_all(fetches).await?;
            let count = entries.len();

            self.put_all(entries)
                .await
                .map_err(|e| DomainError::population(self.name(), e.to_string()))?;

            Ok(count)
        }
    }
}

// Blanket implementation for all types implementing CacheRegion
impl<T: CacheRegion + ?Sized> CacheRegionExt for T {}
