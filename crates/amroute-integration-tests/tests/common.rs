//! Common test utilities for integration tests

use amroute_config_file::{FileConfigStore, FileProvenanceStore};
use amroute_core::{
    Error, OrgId, ProvenanceStore, Result,
    definitions::{MuteTimeInterval, Provenance, ResourceRef, TimeInterval, TimeRange},
};
use amroute_provisioning::MuteTimingService;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tempfile::TempDir;

/// A data directory with both file stores opened on it
#[allow(dead_code)]
pub struct FileStores {
    pub dir: TempDir,
    pub configs: Arc<FileConfigStore>,
    pub provenance: Arc<FileProvenanceStore>,
}

#[allow(dead_code)]
impl FileStores {
    pub async fn open() -> Self {
        let dir = TempDir::new().unwrap();
        let configs = Arc::new(FileConfigStore::new(dir.path()).await.unwrap());
        let provenance = Arc::new(FileProvenanceStore::new(dir.path()).await.unwrap());
        Self {
            dir,
            configs,
            provenance,
        }
    }

    pub fn service(&self) -> MuteTimingService {
        MuteTimingService::new(self.configs.clone(), self.provenance.clone())
    }
}

#[allow(dead_code)]
pub fn org(id: i64) -> OrgId {
    OrgId::new(id).unwrap()
}

#[allow(dead_code)]
pub fn nights(name: &str) -> MuteTimeInterval {
    MuteTimeInterval::new(name).with_time_interval(TimeInterval {
        times: vec![
            TimeRange::new("22:00", "24:00"),
            TimeRange::new("00:00", "06:00"),
        ],
        location: Some("Europe/Berlin".to_string()),
        ..Default::default()
    })
}

/// Provenance store whose writes can be switched off to simulate an outage
#[derive(Default)]
#[allow(dead_code)]
pub struct FlakyProvenanceStore {
    records: std::sync::Mutex<HashMap<ResourceRef, Provenance>>,
    down: AtomicBool,
}

#[allow(dead_code)]
impl FlakyProvenanceStore {
    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    fn check(&self) -> Result<()> {
        if self.down.load(Ordering::SeqCst) {
            return Err(Error::StoreUnavailable(
                "provenance store offline".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl ProvenanceStore for FlakyProvenanceStore {
    async fn get_provenance(&self, _org_id: OrgId, resource: &ResourceRef) -> Result<Provenance> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .get(resource)
            .copied()
            .unwrap_or_default())
    }

    async fn get_provenances(
        &self,
        _org_id: OrgId,
        resource_type: &str,
    ) -> Result<HashMap<String, Provenance>> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|(r, _)| r.resource_type == resource_type)
            .map(|(r, p)| (r.resource_id.clone(), *p))
            .collect())
    }

    async fn set_provenance(
        &self,
        _org_id: OrgId,
        resource: &ResourceRef,
        provenance: Provenance,
    ) -> Result<()> {
        self.check()?;
        self.records
            .lock()
            .unwrap()
            .insert(resource.clone(), provenance);
        Ok(())
    }

    async fn delete_provenance(&self, _org_id: OrgId, resource: &ResourceRef) -> Result<()> {
        self.check()?;
        self.records.lock().unwrap().remove(resource);
        Ok(())
    }
}
