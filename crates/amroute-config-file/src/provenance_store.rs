//! File-based ProvenanceStore implementation

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use tokio::sync::Mutex;
use tracing::debug;

use amroute_core::{
    OrgId, ProvenanceStore, Result,
    definitions::{Provenance, ResourceRef},
};

use crate::format::{DocumentFormat, expand_home, read_optional, write_atomic};

const PROVENANCE_FILE: &str = "provenance.yaml";

/// org -> resource type -> resource id -> provenance
type ProvenanceDocument = BTreeMap<i64, BTreeMap<String, BTreeMap<String, Provenance>>>;

/// Provenance records for all organizations in a single YAML file
#[derive(Debug)]
pub struct FileProvenanceStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileProvenanceStore {
    pub async fn new(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = expand_home(data_dir.into())?;
        tokio::fs::create_dir_all(&data_dir).await?;

        Ok(Self {
            path: data_dir.join(PROVENANCE_FILE),
            write_lock: Mutex::new(()),
        })
    }

    async fn load(&self) -> Result<ProvenanceDocument> {
        match read_optional(&self.path).await? {
            Some(contents) if !contents.trim().is_empty() => {
                DocumentFormat::Yaml.decode(&contents, &self.path)
            }
            _ => Ok(ProvenanceDocument::new()),
        }
    }

    async fn store(&self, document: &ProvenanceDocument) -> Result<()> {
        let contents = DocumentFormat::Yaml.encode(document)?;
        write_atomic(&self.path, &contents).await
    }
}

#[async_trait]
impl ProvenanceStore for FileProvenanceStore {
    async fn get_provenance(&self, org_id: OrgId, resource: &ResourceRef) -> Result<Provenance> {
        let document = self.load().await?;
        Ok(document
            .get(&org_id.as_i64())
            .and_then(|types| types.get(&resource.resource_type))
            .and_then(|ids| ids.get(&resource.resource_id))
            .copied()
            .unwrap_or_default())
    }

    async fn get_provenances(
        &self,
        org_id: OrgId,
        resource_type: &str,
    ) -> Result<HashMap<String, Provenance>> {
        let document = self.load().await?;
        Ok(document
            .get(&org_id.as_i64())
            .and_then(|types| types.get(resource_type))
            .map(|ids| ids.iter().map(|(id, p)| (id.clone(), *p)).collect())
            .unwrap_or_default())
    }

    async fn set_provenance(
        &self,
        org_id: OrgId,
        resource: &ResourceRef,
        provenance: Provenance,
    ) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.load().await?;

        document
            .entry(org_id.as_i64())
            .or_default()
            .entry(resource.resource_type.clone())
            .or_default()
            .insert(resource.resource_id.clone(), provenance);

        self.store(&document).await?;
        debug!(
            "Recorded provenance '{}' for {} '{}' in org {}",
            provenance, resource.resource_type, resource.resource_id, org_id
        );
        Ok(())
    }

    async fn delete_provenance(&self, org_id: OrgId, resource: &ResourceRef) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.load().await?;

        let Some(types) = document.get_mut(&org_id.as_i64()) else {
            return Ok(());
        };
        let removed = types
            .get_mut(&resource.resource_type)
            .and_then(|ids| ids.remove(&resource.resource_id));
        if removed.is_none() {
            return Ok(());
        }

        types.retain(|_, ids| !ids.is_empty());
        document.retain(|_, types| !types.is_empty());

        self.store(&document).await?;
        debug!(
            "Cleared provenance for {} '{}' in org {}",
            resource.resource_type, resource.resource_id, org_id
        );
        Ok(())
    }
}
