//! File-based ConfigStore implementation

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use amroute_core::{
    ConfigStore, ConfigVersion, OrgId, Result, StoredConfig, config_store::check_version,
};

use crate::format::{DocumentFormat, expand_home, read_optional, write_atomic};

/// What each `org-<id>` file holds
#[derive(Debug, Serialize, Deserialize)]
struct ConfigDocument {
    version: ConfigVersion,
    updated_at: chrono::DateTime<chrono::Utc>,
    config: serde_json::Value,
}

impl From<ConfigDocument> for StoredConfig {
    fn from(doc: ConfigDocument) -> Self {
        StoredConfig {
            config: doc.config,
            version: doc.version,
            updated_at: doc.updated_at,
        }
    }
}

/// File-based configuration store
///
/// Keeps one document per organization in a data directory. Writes replace
/// the whole document atomically; the version check and the write happen
/// under one lock so concurrent writers in this process are serialized.
#[derive(Debug)]
pub struct FileConfigStore {
    data_dir: PathBuf,
    format: DocumentFormat,
    write_lock: Mutex<()>,
}

impl FileConfigStore {
    /// Open (creating if needed) a data directory holding YAML documents
    ///
    /// # Errors
    /// - `Error::Io` if the directory can't be created
    /// - `Error::Config` if `~` is used and there is no home directory
    pub async fn new(data_dir: impl Into<PathBuf>) -> Result<Self> {
        Self::with_format(data_dir, DocumentFormat::Yaml).await
    }

    pub async fn with_format(data_dir: impl Into<PathBuf>, format: DocumentFormat) -> Result<Self> {
        let data_dir = expand_home(data_dir.into())?;
        tokio::fs::create_dir_all(&data_dir).await?;

        info!(
            "Initialized FileConfigStore in {:?} ({} documents)",
            data_dir,
            format.extension()
        );

        Ok(Self {
            data_dir,
            format,
            write_lock: Mutex::new(()),
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn org_path(&self, org_id: OrgId) -> PathBuf {
        self.data_dir
            .join(format!("org-{}.{}", org_id, self.format.extension()))
    }

    async fn read_document(&self, path: &Path) -> Result<Option<ConfigDocument>> {
        match read_optional(path).await? {
            Some(contents) => Ok(Some(self.format.decode(&contents, path)?)),
            None => Ok(None),
        }
    }

    /// Organization ID encoded in a document file name, if it is one of ours
    fn parse_org_file(&self, file_name: &str) -> Option<OrgId> {
        file_name
            .strip_prefix("org-")?
            .strip_suffix(self.format.extension())?
            .strip_suffix('.')?
            .parse()
            .ok()
    }
}

#[async_trait]
impl ConfigStore for FileConfigStore {
    async fn get_config(&self, org_id: OrgId) -> Result<Option<StoredConfig>> {
        let path = self.org_path(org_id);
        let document = self.read_document(&path).await?;
        debug!(
            "Read config for org {} from {:?}: {}",
            org_id,
            path,
            if document.is_some() { "found" } else { "absent" }
        );
        Ok(document.map(StoredConfig::from))
    }

    async fn save_config(
        &self,
        org_id: OrgId,
        config: serde_json::Value,
        expected_version: Option<ConfigVersion>,
    ) -> Result<ConfigVersion> {
        self.validate_config(&config).await?;

        let path = self.org_path(org_id);
        let _guard = self.write_lock.lock().await;

        let current = self.read_document(&path).await?.map(|doc| doc.version);
        if let Err(e) = check_version(expected_version, current) {
            warn!("Rejected write to {:?}: {}", path, e);
            return Err(e);
        }

        let document = ConfigDocument {
            version: current.map_or(1, |v| v + 1),
            updated_at: chrono::Utc::now(),
            config,
        };
        let contents = self.format.encode(&document)?;
        write_atomic(&path, &contents).await?;

        info!(
            "Wrote config for org {} to {:?} (version {})",
            org_id, path, document.version
        );
        Ok(document.version)
    }

    async fn list_orgs(&self) -> Result<Vec<OrgId>> {
        let mut entries = tokio::fs::read_dir(&self.data_dir).await?;
        let mut orgs = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            if let Some(org_id) = entry
                .file_name()
                .to_str()
                .and_then(|name| self.parse_org_file(name))
            {
                orgs.push(org_id);
            }
        }

        orgs.sort();
        Ok(orgs)
    }
}
