//! amroute Core Types and Traits
//!
//! This crate provides the fundamental types and traits used throughout amroute:
//! - Routing configuration data model (routes, receivers, mute time intervals)
//! - Mute time interval validation
//! - Store trait abstractions for configuration snapshots and provenance
//! - Core error types

pub mod config_store;
pub mod definitions;
pub mod error;
pub mod labels;
pub mod org;
pub mod provenance_store;
pub mod validation;

pub use config_store::{ConfigStore, ConfigVersion, StoredConfig};
pub use error::{Error, ErrorKind, Result};
pub use org::OrgId;
pub use provenance_store::ProvenanceStore;
