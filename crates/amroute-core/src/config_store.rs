//! Configuration store trait
//!
//! The `ConfigStore` trait abstracts over where each organization's routing
//! configuration snapshot lives. Every snapshot carries a version that is
//! bumped on each write; writes are conditional on the caller's last-seen
//! version so concurrent writers cannot silently overwrite each other.

use async_trait::async_trait;

use crate::{Error, Result, org::OrgId};

/// Monotonic snapshot version used as the optimistic-concurrency token
pub type ConfigVersion = u64;

/// A stored configuration snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct StoredConfig {
    /// The routing configuration as JSON.
    /// Callers deserialize this into `RoutingConfig`.
    pub config: serde_json::Value,

    /// Version of this snapshot
    pub version: ConfigVersion,

    /// When this version was written
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Configuration store trait
///
/// Implementations:
/// - `InMemoryConfigStore`: process-local maps (tests, embedding)
/// - `FileConfigStore`: one document per organization on disk
///
/// # Example
/// ```no_run
/// # use amroute_core::config_store::ConfigStore;
/// # use amroute_core::org::OrgId;
/// # async fn example(store: &dyn ConfigStore) -> amroute_core::Result<()> {
/// let org_id = OrgId::new(1)?;
/// if let Some(stored) = store.get_config(org_id).await? {
///     let mut config = stored.config;
///     config["receivers"] = serde_json::json!([]);
///     store.save_config(org_id, config, Some(stored.version)).await?;
/// }
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Get the current configuration snapshot for an organization
    ///
    /// # Returns
    /// `None` if the organization has never stored a configuration.
    ///
    /// # Errors
    /// - `Error::StoreUnavailable` for backend failures
    async fn get_config(&self, org_id: OrgId) -> Result<Option<StoredConfig>>;

    /// Conditionally write a configuration snapshot
    ///
    /// # Arguments
    /// * `org_id` - Owning organization
    /// * `config` - New configuration as JSON
    /// * `expected_version` - Version the caller read; `None` means the
    ///   organization must not have a configuration yet
    ///
    /// # Returns
    /// The version assigned to the new snapshot.
    ///
    /// # Errors
    /// - `Error::StaleWrite` if the stored version differs from `expected_version`
    /// - `Error::Config` if the config is rejected by `validate_config`
    /// - `Error::StoreUnavailable` for backend failures
    async fn save_config(
        &self,
        org_id: OrgId,
        config: serde_json::Value,
        expected_version: Option<ConfigVersion>,
    ) -> Result<ConfigVersion>;

    /// Validate configuration before saving
    ///
    /// The default only requires a JSON object.
    async fn validate_config(&self, config: &serde_json::Value) -> Result<()> {
        if !config.is_object() {
            return Err(Error::Config(
                "Configuration must be a JSON object".to_string(),
            ));
        }
        Ok(())
    }

    /// List organizations that have a stored configuration
    async fn list_orgs(&self) -> Result<Vec<OrgId>> {
        Ok(Vec::new())
    }
}

/// Check an optimistic-concurrency condition.
///
/// Shared by store implementations so they report conflicts identically.
pub fn check_version(
    expected: Option<ConfigVersion>,
    actual: Option<ConfigVersion>,
) -> Result<()> {
    if expected != actual {
        return Err(Error::StaleWrite { expected, actual });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_version() {
        assert!(check_version(None, None).is_ok());
        assert!(check_version(Some(3), Some(3)).is_ok());

        assert!(matches!(
            check_version(Some(3), Some(4)),
            Err(Error::StaleWrite {
                expected: Some(3),
                actual: Some(4)
            })
        ));
        assert!(matches!(
            check_version(None, Some(1)),
            Err(Error::StaleWrite { .. })
        ));
    }
}
