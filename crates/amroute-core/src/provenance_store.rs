//! Provenance store trait
//!
//! Provenance records which authority last wrote a provisioned resource.
//! Records are keyed by organization, resource type and resource ID and live
//! outside the configuration snapshot, so they are not covered by its
//! version token.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::{
    Result,
    definitions::{Provenance, ResourceRef},
    org::OrgId,
};

#[async_trait]
pub trait ProvenanceStore: Send + Sync {
    /// Provenance of a single resource; `Provenance::None` if unrecorded
    async fn get_provenance(&self, org_id: OrgId, resource: &ResourceRef) -> Result<Provenance>;

    /// All recorded provenances of one resource type, keyed by resource ID
    async fn get_provenances(
        &self,
        org_id: OrgId,
        resource_type: &str,
    ) -> Result<HashMap<String, Provenance>>;

    /// Record (or overwrite) a resource's provenance
    async fn set_provenance(
        &self,
        org_id: OrgId,
        resource: &ResourceRef,
        provenance: Provenance,
    ) -> Result<()>;

    /// Forget a resource's provenance. Deleting an unknown record is not an error.
    async fn delete_provenance(&self, org_id: OrgId, resource: &ResourceRef) -> Result<()>;
}
