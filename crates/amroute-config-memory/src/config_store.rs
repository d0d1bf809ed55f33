//! DashMap-backed ConfigStore

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;

use amroute_core::{
    ConfigStore, ConfigVersion, OrgId, Result, StoredConfig, config_store::check_version,
};

/// In-memory configuration store.
///
/// Conditional writes run under the map's entry lock, so two writers racing
/// on the same version cannot both succeed.
#[derive(Debug, Default)]
pub struct InMemoryConfigStore {
    configs: DashMap<OrgId, StoredConfig>,
}

impl InMemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConfigStore for InMemoryConfigStore {
    async fn get_config(&self, org_id: OrgId) -> Result<Option<StoredConfig>> {
        Ok(self.configs.get(&org_id).map(|entry| entry.value().clone()))
    }

    async fn save_config(
        &self,
        org_id: OrgId,
        config: serde_json::Value,
        expected_version: Option<ConfigVersion>,
    ) -> Result<ConfigVersion> {
        self.validate_config(&config).await?;

        let version = match self.configs.entry(org_id) {
            Entry::Occupied(mut entry) => {
                check_version(expected_version, Some(entry.get().version))?;
                let version = entry.get().version + 1;
                entry.insert(StoredConfig {
                    config,
                    version,
                    updated_at: chrono::Utc::now(),
                });
                version
            }
            Entry::Vacant(entry) => {
                check_version(expected_version, None)?;
                entry.insert(StoredConfig {
                    config,
                    version: 1,
                    updated_at: chrono::Utc::now(),
                });
                1
            }
        };

        debug!("Stored config for org {} at version {}", org_id, version);
        Ok(version)
    }

    async fn list_orgs(&self) -> Result<Vec<OrgId>> {
        let mut orgs: Vec<OrgId> = self.configs.iter().map(|entry| *entry.key()).collect();
        orgs.sort();
        Ok(orgs)
    }
}
