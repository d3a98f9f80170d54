//! One-shot lifecycle commands
//!
//! Most useful with the redis backend, where regions outlive the process.

use serde::Serialize;

use crate::domain::{CacheRegion, CacheStorage};

/// Populate the current cache region and print the report
pub async fn install() -> anyhow::Result<()> {
    let config = super::bootstrap();
    let state = crate::create_app_state(&config).await?;

    let report = state.lifecycle.on_install().await?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

/// Delete stale cache regions and print the report
pub async fn activate() -> anyhow::Result<()> {
    let config = super::bootstrap();
    let state = crate::create_app_state(&config).await?;

    let report = state.lifecycle.on_activate().await?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct CacheSummary {
    name: String,
    entries: usize,
    current: bool,
}

/// List cache regions in the configured storage
pub async fn list() -> anyhow::Result<()> {
    let config = super::bootstrap();
    let state = crate::create_app_state(&config).await?;

    let current = state.lifecycle.version().cache_name();
    let summaries = summarize(state.storage.as_ref(), current).await?;

    println!("{}", serde_json::to_string_pretty(&summaries)?);

    Ok(())
}

async fn summarize(storage: &dyn CacheStorage, current: &str) -> anyhow::Result<Vec<CacheSummary>> {
    let mut summaries = Vec::new();

    for name in storage.keys().await? {
        let entries = storage.open(&name).await?.keys().await?.len();

        summaries.push(CacheSummary {
            current: name == current,
            name,
            entries,
        });
    }

    Ok(summaries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cache::{AssetResponse, MockCacheStorage, RequestKey};

    #[tokio::test]
    async fn test_summarize_lists_regions_with_counts() {
        let storage = MockCacheStorage::new()
            .with_region("OTHER-v1")
            .with_entry(
                "APP-v2",
                RequestKey::get("https://example.com/index.html"),
                AssetResponse::new(200, "https://example.com/index.html"),
            );

        let summaries = summarize(&storage, "APP-v2").await.unwrap();

        assert_eq!(
            summaries,
            vec![
                CacheSummary {
                    name: "APP-v2".to_string(),
                    entries: 1,
                    current: true,
                },
                CacheSummary {
                    name: "OTHER-v1".to_string(),
                    entries: 0,
                    current: false,
                },
            ]
        );
    }
}
