//! Migration of legacy notification channels into the routing tree
//!
//! Legacy channels become receivers plus one route each. All of those routes
//! hang off a single "legacy subtree" under the root route so that migrated
//! structure never interleaves with hand-written root-level routes.
//!
//! # Example
//! ```
//! use amroute_core::definitions::ManagedReceiver;
//! use amroute_migration::{LegacyRouteTree, channel_route, contact_label};
//!
//! let mut tree = LegacyRouteTree::new();
//! let channel = ManagedReceiver::new("uid-1", "ops-email", "email");
//! let wrapper = tree.add_receiver(Some(channel)).map(|r| r.name.clone());
//! if let Some(name) = wrapper {
//!     tree.add_route(Some(channel_route(&name, &contact_label("ops-email"))));
//! }
//! assert_eq!(tree.contact_label_for("uid-1"), "__legacy_c_ops-email__");
//! let config = tree.finalize();
//! assert!(config.route.is_some());
//! ```

mod bootstrap;
mod legacy_tree;

pub use bootstrap::{bootstrap_org, migrate_channels};
pub use legacy_tree::{
    LegacyRouteTree, channel_route, contact_label, default_root_route, is_legacy_subtree,
    legacy_subtree,
};
