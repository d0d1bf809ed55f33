//! File-based stores for single-node amroute deployments
//!
//! This crate implements the `ConfigStore` and `ProvenanceStore` traits on
//! top of a data directory:
//! - `org-<id>.yaml` (or `.json`): one versioned configuration document per organization
//! - `provenance.yaml`: provenance records for every organization
//!
//! # Features
//! - YAML or JSON documents
//! - Atomic replacement (temp file + rename), so readers never see a partial write
//! - Conditional writes serialized through an async mutex
//!
//! # Example
//! ```no_run
//! # use amroute_config_file::FileConfigStore;
//! # use amroute_core::{ConfigStore, OrgId};
//! # async fn example() -> amroute_core::Result<()> {
//! let store = FileConfigStore::new("~/.amroute/data").await?;
//! let config = store.get_config(OrgId::new(1)?).await?;
//! # Ok(())
//! # }
//! ```

mod file_store;
mod format;
mod provenance_store;

pub use file_store::FileConfigStore;
pub use format::DocumentFormat;
pub use provenance_store::FileProvenanceStore;
