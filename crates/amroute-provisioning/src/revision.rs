//! Versioned configuration snapshots and the commit protocol

use std::future::Future;
use std::sync::Arc;

use tracing::{debug, info, warn};

use amroute_core::{
    ConfigStore, ConfigVersion, Error, OrgId, Result, definitions::RoutingConfig,
};

/// A decoded configuration snapshot together with the version it was read at
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigRevision {
    pub config: RoutingConfig,
    pub version: ConfigVersion,
}

/// Typed view over a [`ConfigStore`]
#[derive(Clone)]
pub struct RevisionStore {
    store: Arc<dyn ConfigStore>,
}

impl RevisionStore {
    pub fn new(store: Arc<dyn ConfigStore>) -> Self {
        Self { store }
    }

    /// Load the latest revision for an organization
    ///
    /// # Errors
    /// - `Error::ConfigNotFound` if the organization has no configuration
    /// - `Error::Serialization` if the stored snapshot cannot be decoded
    pub async fn get(&self, org_id: OrgId) -> Result<ConfigRevision> {
        let stored = self
            .store
            .get_config(org_id)
            .await?
            .ok_or(Error::ConfigNotFound)?;

        let config: RoutingConfig = serde_json::from_value(stored.config)?;
        debug!(
            "Loaded config revision {} for org {}",
            stored.version, org_id
        );

        Ok(ConfigRevision {
            config,
            version: stored.version,
        })
    }

    /// Persist `revision` if its version is still current, then run `post_commit`.
    ///
    /// `post_commit` is not polled unless the write succeeded. A failure in
    /// the write is returned unchanged; a failure in `post_commit` is wrapped
    /// in `Error::ProvenanceNotRecorded` and leaves the new snapshot in place.
    pub async fn save<F>(
        &self,
        org_id: OrgId,
        revision: &ConfigRevision,
        post_commit: F,
    ) -> Result<ConfigVersion>
    where
        F: Future<Output = Result<()>> + Send,
    {
        revision.config.validate_references()?;
        let config = serde_json::to_value(&revision.config)?;

        let version = match self
            .store
            .save_config(org_id, config, Some(revision.version))
            .await
        {
            Ok(version) => version,
            Err(e @ Error::StaleWrite { .. }) => {
                warn!(
                    "Config for org {} changed since revision {}: {}",
                    org_id, revision.version, e
                );
                return Err(e);
            }
            Err(e) => return Err(e),
        };

        info!(
            "Committed config for org {}: version {} -> {}",
            org_id, revision.version, version
        );

        if let Err(e) = post_commit.await {
            warn!(
                "Config version {} for org {} committed but post-commit step failed: {}",
                version, org_id, e
            );
            return Err(Error::ProvenanceNotRecorded(Box::new(e)));
        }

        Ok(version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amroute_config_memory::InMemoryConfigStore;
    use amroute_core::definitions::{MuteTimeInterval, Route};
    use std::sync::atomic::{AtomicBool, Ordering};

    async fn seeded_store() -> (RevisionStore, OrgId) {
        let store = Arc::new(InMemoryConfigStore::new());
        let org_id = OrgId::new(1).unwrap();
        let config = RoutingConfig {
            route: Some(Route::new("default")),
            ..Default::default()
        };
        store
            .save_config(org_id, serde_json::to_value(&config).unwrap(), None)
            .await
            .unwrap();
        (RevisionStore::new(store), org_id)
    }

    #[tokio::test]
    async fn test_get_missing_org() {
        let revisions = RevisionStore::new(Arc::new(InMemoryConfigStore::new()));
        let result = revisions.get(OrgId::new(7).unwrap()).await;
        assert!(matches!(result, Err(Error::ConfigNotFound)));
    }

    #[tokio::test]
    async fn test_undecodable_snapshot_is_permanent() {
        let store = Arc::new(InMemoryConfigStore::new());
        let org_id = OrgId::new(1).unwrap();
        store
            .save_config(org_id, serde_json::json!({"route": 5}), None)
            .await
            .unwrap();

        let err = RevisionStore::new(store).get(org_id).await.unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
        assert!(!err.kind().is_retryable());
    }

    #[tokio::test]
    async fn test_save_runs_post_commit_after_write() {
        let (revisions, org_id) = seeded_store().await;
        let mut revision = revisions.get(org_id).await.unwrap();
        assert_eq!(revision.version, 1);

        revision.config.mute_time_intervals = Some(vec![MuteTimeInterval::new("weekends")]);
        let ran = AtomicBool::new(false);
        let version = revisions
            .save(org_id, &revision, async {
                ran.store(true, Ordering::SeqCst);
                Ok(())
            })
            .await
            .unwrap();

        assert_eq!(version, 2);
        assert!(ran.load(Ordering::SeqCst));
        let reloaded = revisions.get(org_id).await.unwrap();
        assert_eq!(reloaded.config, revision.config);
    }

    #[tokio::test]
    async fn test_stale_revision_skips_post_commit() {
        let (revisions, org_id) = seeded_store().await;
        let first = revisions.get(org_id).await.unwrap();
        let second = first.clone();

        revisions.save(org_id, &first, async { Ok(()) }).await.unwrap();

        let ran = AtomicBool::new(false);
        let result = revisions
            .save(org_id, &second, async {
                ran.store(true, Ordering::SeqCst);
                Ok(())
            })
            .await;

        assert!(matches!(
            result,
            Err(Error::StaleWrite {
                expected: Some(1),
                actual: Some(2)
            })
        ));
        assert!(!ran.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_post_commit_failure_keeps_snapshot() {
        let (revisions, org_id) = seeded_store().await;
        let mut revision = revisions.get(org_id).await.unwrap();
        revision.config.mute_time_intervals = Some(vec![MuteTimeInterval::new("weekends")]);

        let result = revisions
            .save(org_id, &revision, async {
                Err(Error::StoreUnavailable("provenance db down".to_string()))
            })
            .await;

        match result {
            Err(Error::ProvenanceNotRecorded(inner)) => {
                assert!(matches!(*inner, Error::StoreUnavailable(_)));
            }
            other => panic!("Expected ProvenanceNotRecorded, got {:?}", other),
        }

        let reloaded = revisions.get(org_id).await.unwrap();
        assert_eq!(reloaded.version, 2);
        assert!(reloaded.config.mute_time_interval("weekends").is_some());
    }

    #[tokio::test]
    async fn test_dangling_reference_rejected_before_write() {
        let (revisions, org_id) = seeded_store().await;
        let mut revision = revisions.get(org_id).await.unwrap();
        revision.config.route =
            Some(Route::new("default").with_route(Route::new("ops").with_mute_time_interval("ghost")));

        let result = revisions.save(org_id, &revision, async { Ok(()) }).await;
        assert!(matches!(result, Err(Error::InvalidInput(_))));
        assert_eq!(revisions.get(org_id).await.unwrap().version, 1);
    }
}
