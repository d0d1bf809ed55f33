//! DashMap-backed ProvenanceStore

use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::HashMap;

use amroute_core::{
    OrgId, ProvenanceStore, Result,
    definitions::{Provenance, ResourceRef},
};

/// In-memory provenance records, grouped by (org, resource type)
#[derive(Debug, Default)]
pub struct InMemoryProvenanceStore {
    records: DashMap<(OrgId, String), HashMap<String, Provenance>>,
}

impl InMemoryProvenanceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProvenanceStore for InMemoryProvenanceStore {
    async fn get_provenance(&self, org_id: OrgId, resource: &ResourceRef) -> Result<Provenance> {
        Ok(self
            .records
            .get(&(org_id, resource.resource_type.clone()))
            .and_then(|by_id| by_id.get(&resource.resource_id).copied())
            .unwrap_or_default())
    }

    async fn get_provenances(
        &self,
        org_id: OrgId,
        resource_type: &str,
    ) -> Result<HashMap<String, Provenance>> {
        Ok(self
            .records
            .get(&(org_id, resource_type.to_string()))
            .map(|by_id| by_id.value().clone())
            .unwrap_or_default())
    }

    async fn set_provenance(
        &self,
        org_id: OrgId,
        resource: &ResourceRef,
        provenance: Provenance,
    ) -> Result<()> {
        self.records
            .entry((org_id, resource.resource_type.clone()))
            .or_default()
            .insert(resource.resource_id.clone(), provenance);
        Ok(())
    }

    async fn delete_provenance(&self, org_id: OrgId, resource: &ResourceRef) -> Result<()> {
        if let Some(mut by_id) = self
            .records
            .get_mut(&(org_id, resource.resource_type.clone()))
        {
            by_id.remove(&resource.resource_id);
        }
        Ok(())
    }
}
