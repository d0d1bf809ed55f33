//! amroute Provisioning
//!
//! Provenance-tracked management of provisionable resources inside an
//! organization's routing configuration.
//!
//! Every mutation follows the same commit protocol: read the snapshot and its
//! version, change it in memory, then [`RevisionStore::save`] it conditioned
//! on that version and only afterwards record the resource's provenance.

pub mod mute_timings;
pub mod revision;

pub use mute_timings::MuteTimingService;
pub use revision::{ConfigRevision, RevisionStore};
