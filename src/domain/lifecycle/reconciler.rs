//! Activate phase - removes stale cache regions

use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;
use tracing::{info, warn};

use crate::domain::cache::{CacheStorage, CacheVersion};
use crate::domain::DomainError;

/// A stale region that could not be deleted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletionFailure {
    pub cache: String,
    pub message: String,
}

/// Outcome of an activation
#[derive(Debug, Clone, Default, Serialize)]
pub struct ActivationReport {
    pub current: String,
    /// Existing regions that were preserved
    pub kept: Vec<String>,
    pub deleted: Vec<String>,
    pub failed: Vec<DeletionFailure>,
}

impl ActivationReport {
    /// True when every stale region was deleted
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Deletes every region of this application family except the current one
#[derive(Debug, Clone)]
pub struct Reconciler {
    storage: Arc<dyn CacheStorage>,
    version: CacheVersion,
}

impl Reconciler {
    pub fn new(storage: Arc<dyn CacheStorage>, version: CacheVersion) -> Self {
        Self { storage, version }
    }

    /// Runs the activate phase.
    ///
    /// Deletions run concurrently and independently; individual failures are
    /// collected in the report and never abort the others. Only failing to
    /// enumerate regions is an error.
    pub async fn activate(&self) -> Result<ActivationReport, DomainError> {
        let existing = self.storage.keys().await?;
        let keep_list = self.version.keep_list(&existing);

        let (kept, stale): (Vec<String>, Vec<String>) = existing
            .into_iter()
            .partition(|name| keep_list.contains(name));

        let deletions = stale.into_iter().map(|name| async move {
            info!(cache = %name, "deleting cache");
            let result = self.storage.delete(&name).await;
            (name, result)
        });

        let mut report = ActivationReport {
            current: self.version.cache_name().to_string(),
            kept,
            ..Default::default()
        };

        for (name, result) in join_all(deletions).await {
            match result {
                Ok(_) => report.deleted.push(name),
                Err(e) => {
                    let message = DomainError::deletion(&name, e.to_string()).to_string();
                    warn!(cache = %name, error = %message, "failed to delete stale cache");
                    report.failed.push(DeletionFailure {
                        cache: name,
                        message,
                    });
                }
            }
        }

        if report.is_clean() {
            info!(
                cache = %report.current,
                deleted = report.deleted.len(),
                kept = report.kept.len(),
                "cache activated"
            );
        } else {
            warn!(
                cache = %report.current,
                deleted = report.deleted.len(),
                failed = report.failed.len(),
                "cache activated with deletion failures"
            );
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cache::MockCacheStorage;

    fn reconciler(storage: Arc<MockCacheStorage>) -> Reconciler {
        Reconciler::new(storage, CacheVersion::new("APP-", "v2").unwrap())
    }

    #[tokio::test]
    async fn test_activate_deletes_previous_versions() {
        let storage = Arc::new(
            MockCacheStorage::new()
                .with_region("APP-v1")
                .with_region("OTHER-v1")
                .with_region("APP-v2"),
        );

        let report = reconciler(storage.clone()).activate().await.unwrap();

        assert_eq!(storage.names(), vec!["APP-v2".to_string(), "OTHER-v1".to_string()]);
        assert_eq!(report.deleted, vec!["APP-v1".to_string()]);
        assert!(report.is_clean());
    }

    #[tokio::test]
    async fn test_activate_leaves_other_applications_untouched() {
        let storage = Arc::new(
            MockCacheStorage::new()
                .with_region("OTHER-v1")
                .with_region("OTHER-v2")
                .with_region("unrelated"),
        );

        let report = reconciler(storage.clone()).activate().await.unwrap();

        assert_eq!(
            storage.names(),
            vec![
                "OTHER-v1".to_string(),
                "OTHER-v2".to_string(),
                "unrelated".to_string()
            ]
        );
        assert!(report.deleted.is_empty());
        assert_eq!(report.kept.len(), 3);
    }

    #[tokio::test]
    async fn test_activate_matches_prefix_anywhere_in_name() {
        let storage = Arc::new(
            MockCacheStorage::new()
                .with_region("legacy-APP-v0")
                .with_region("APP-v2"),
        );

        reconciler(storage.clone()).activate().await.unwrap();

        assert_eq!(storage.names(), vec!["APP-v2".to_string()]);
    }

    #[tokio::test]
    async fn test_activate_continues_after_deletion_failure() {
        let storage = Arc::new(
            MockCacheStorage::new()
                .with_region("APP-v0")
                .with_region("APP-v1")
                .with_region("APP-v2")
                .with_delete_failure("APP-v0"),
        );

        let report = reconciler(storage.clone()).activate().await.unwrap();

        assert!(!report.is_clean());
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].cache, "APP-v0");
        assert_eq!(
            report.failed[0].message,
            "Failed to delete cache 'APP-v0': Cache error: delete of 'APP-v0' rejected"
        );
        assert_eq!(report.deleted, vec!["APP-v1".to_string()]);
        assert_eq!(storage.names(), vec!["APP-v0".to_string(), "APP-v2".to_string()]);
    }

    #[tokio::test]
    async fn test_activate_without_existing_regions() {
        let storage = Arc::new(MockCacheStorage::new());

        let report = reconciler(storage).activate().await.unwrap();

        assert_eq!(report.current, "APP-v2");
        assert!(report.kept.is_empty());
        assert!(report.deleted.is_empty());
    }

    #[tokio::test]
    async fn test_activate_fails_when_regions_cannot_be_listed() {
        let storage = Arc::new(MockCacheStorage::new().with_error("storage offline"));

        let result = reconciler(storage).activate().await;
        assert!(matches!(result, Err(DomainError::Cache { .. })));
    }
}
