//! Mute timing provisioning
//!
//! CRUD over the organization's mute time interval collection. Definitions
//! live in the configuration snapshot; the authority that wrote each one is
//! tracked separately in the provenance store.

use std::sync::Arc;

use tracing::{debug, info};

use amroute_core::{
    ConfigStore, Error, OrgId, ProvenanceStore, Result,
    definitions::{MUTE_TIMING_RESOURCE_TYPE, MuteTiming, Provisionable, ResourceRef},
};

use crate::revision::RevisionStore;

pub struct MuteTimingService {
    configs: RevisionStore,
    provenance: Arc<dyn ProvenanceStore>,
}

impl MuteTimingService {
    pub fn new(config_store: Arc<dyn ConfigStore>, provenance: Arc<dyn ProvenanceStore>) -> Self {
        Self {
            configs: RevisionStore::new(config_store),
            provenance,
        }
    }

    /// All mute timings of an organization, in stored order, with provenance.
    pub async fn list(&self, org_id: OrgId) -> Result<Vec<MuteTiming>> {
        let revision = self.configs.get(org_id).await?;
        let intervals = match revision.config.mute_time_intervals {
            Some(intervals) if !intervals.is_empty() => intervals,
            _ => return Ok(Vec::new()),
        };

        let provenances = self
            .provenance
            .get_provenances(org_id, MUTE_TIMING_RESOURCE_TYPE)
            .await?;

        Ok(intervals
            .into_iter()
            .map(|interval| {
                let provenance = provenances.get(&interval.name).copied().unwrap_or_default();
                MuteTiming::new(interval, provenance)
            })
            .collect())
    }

    pub async fn get(&self, name: &str, org_id: OrgId) -> Result<MuteTiming> {
        let revision = self.configs.get(org_id).await?;
        let (_, interval) = revision
            .config
            .mute_time_interval(name)
            .ok_or_else(|| not_found(name))?;
        let interval = interval.clone();

        let provenance = self
            .provenance
            .get_provenance(org_id, &interval.resource_ref())
            .await?;

        Ok(MuteTiming::new(interval, provenance))
    }

    /// Add a new mute timing.
    ///
    /// # Errors
    /// - `Error::InvalidInput` if the definition is malformed (nothing is read or written)
    /// - `Error::AlreadyExists` if the name is taken
    /// - `Error::StaleWrite` if the configuration changed concurrently
    /// - `Error::ProvenanceNotRecorded` if the definition was stored but its
    ///   provenance could not be
    pub async fn create(&self, mute_timing: MuteTiming, org_id: OrgId) -> Result<MuteTiming> {
        mute_timing.interval.validate()?;

        let mut revision = self.configs.get(org_id).await?;
        if revision.config.mute_time_interval(mute_timing.name()).is_some() {
            return Err(Error::AlreadyExists(format!(
                "mute time interval '{}'",
                mute_timing.name()
            )));
        }

        revision
            .config
            .mute_time_intervals
            .get_or_insert_with(Vec::new)
            .push(mute_timing.interval.clone());

        let resource = mute_timing.resource_ref();
        self.configs
            .save(
                org_id,
                &revision,
                self.provenance
                    .set_provenance(org_id, &resource, mute_timing.provenance),
            )
            .await?;

        info!(
            "Created mute time interval '{}' for org {} (provenance: {})",
            mute_timing.name(),
            org_id,
            mute_timing.provenance
        );
        Ok(mute_timing)
    }

    /// Replace an existing mute timing of the same name, keeping its position.
    pub async fn update(&self, mute_timing: MuteTiming, org_id: OrgId) -> Result<MuteTiming> {
        mute_timing.interval.validate()?;

        let mut revision = self.configs.get(org_id).await?;
        let idx = revision
            .config
            .mute_time_interval(mute_timing.name())
            .map(|(idx, _)| idx)
            .ok_or_else(|| not_found(mute_timing.name()))?;

        if let Some(intervals) = revision.config.mute_time_intervals.as_mut() {
            intervals[idx] = mute_timing.interval.clone();
        }

        let resource = mute_timing.resource_ref();
        self.configs
            .save(
                org_id,
                &revision,
                self.provenance
                    .set_provenance(org_id, &resource, mute_timing.provenance),
            )
            .await?;

        info!(
            "Updated mute time interval '{}' for org {} (provenance: {})",
            mute_timing.name(),
            org_id,
            mute_timing.provenance
        );
        Ok(mute_timing)
    }

    /// Remove a mute timing.
    ///
    /// Deleting from an organization without any mute timings is a no-op.
    /// An unknown name writes no snapshot but still clears any provenance
    /// left behind under that name.
    ///
    /// # Errors
    /// - `Error::InUse` if any route references the interval
    pub async fn delete(&self, name: &str, org_id: OrgId) -> Result<()> {
        let mut revision = self.configs.get(org_id).await?;
        let Some(intervals) = revision.config.mute_time_intervals.as_ref() else {
            debug!("Org {} has no mute time intervals, nothing to delete", org_id);
            return Ok(());
        };

        if revision.config.is_mute_interval_in_use(name) {
            return Err(Error::InUse(format!(
                "mute time interval '{}' is referenced by a route",
                name
            )));
        }

        let resource = ResourceRef::new(MUTE_TIMING_RESOURCE_TYPE, name);
        let Some(idx) = intervals.iter().position(|mti| mti.name == name) else {
            debug!(
                "Mute time interval '{}' not in config for org {}, clearing provenance only",
                name, org_id
            );
            return self.provenance.delete_provenance(org_id, &resource).await;
        };

        if let Some(intervals) = revision.config.mute_time_intervals.as_mut() {
            intervals.remove(idx);
        }

        self.configs
            .save(
                org_id,
                &revision,
                self.provenance.delete_provenance(org_id, &resource),
            )
            .await?;

        info!("Deleted mute time interval '{}' for org {}", name, org_id);
        Ok(())
    }
}

fn not_found(name: &str) -> Error {
    Error::NotFound(format!("mute time interval '{}'", name))
}
