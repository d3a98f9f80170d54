//! Fetch phase - cache-first request resolution

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::domain::cache::{AssetRequest, AssetResponse, CacheStorage, CacheVersion};
use crate::domain::network::NetworkFetcher;
use crate::domain::DomainError;

/// Where an intercepted response came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseSource {
    Cache,
    Network,
}

#[derive(Debug, Clone)]
pub struct InterceptedResponse {
    pub response: AssetResponse,
    pub source: ResponseSource,
}

/// Serves stored responses from the current region, falling back to the network.
///
/// Network responses are never written back.
#[derive(Debug, Clone)]
pub struct RequestInterceptor {
    storage: Arc<dyn CacheStorage>,
    fetcher: Arc<dyn NetworkFetcher>,
    version: CacheVersion,
}

impl RequestInterceptor {
    pub fn new(
        storage: Arc<dyn CacheStorage>,
        fetcher: Arc<dyn NetworkFetcher>,
        version: CacheVersion,
    ) -> Self {
        Self {
            storage,
            fetcher,
            version,
        }
    }

    pub async fn handle(&self, request: &AssetRequest) -> Result<InterceptedResponse, DomainError> {
        debug!(method = %request.method, url = %request.url, "fetch request");

        let key = request.key();

        match self.storage.match_in(self.version.cache_name(), &key).await {
            Ok(Some(response)) => {
                info!(url = %request.url, "responding with cache");
                return Ok(InterceptedResponse {
                    response,
                    source: ResponseSource::Cache,
                });
            }
            Ok(None) => {}
            Err(e) => {
                warn!(url = %request.url, error = %e, "cache lookup failed, using network");
            }
        }

        info!(url = %request.url, "not cached, fetching");

        let response = self.fetcher.fetch(request).await.inspect_err(|e| {
            warn!(url = %request.url, error = %e, "network fetch failed");
        })?;

        Ok(InterceptedResponse {
            response,
            source: ResponseSource::Network,
        })
    }
}
