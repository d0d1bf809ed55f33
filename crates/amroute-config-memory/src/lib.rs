//! In-memory store implementations
//!
//! Process-local implementations of `ConfigStore` and `ProvenanceStore`,
//! used by tests and by embedders that persist snapshots themselves.
//!
//! # Example
//! ```
//! # use amroute_config_memory::InMemoryConfigStore;
//! # use amroute_core::{ConfigStore, OrgId};
//! # async fn example() -> amroute_core::Result<()> {
//! let store = InMemoryConfigStore::new();
//! let org_id = OrgId::new(1)?;
//! let version = store.save_config(org_id, serde_json::json!({}), None).await?;
//! assert_eq!(version, 1);
//! # Ok(())
//! # }
//! ```

mod config_store;
mod provenance_store;

pub use config_store::InMemoryConfigStore;
pub use provenance_store::InMemoryProvenanceStore;
