//! Persisting migrated configurations

use amroute_core::definitions::{ManagedReceiver, RoutingConfig};
use amroute_core::{ConfigStore, ConfigVersion, OrgId, Result};
use tracing::{debug, info};

use crate::legacy_tree::{LegacyRouteTree, channel_route, contact_label};

/// Make sure an organization has a well-formed routing configuration.
///
/// Equivalent to [`migrate_channels`] with no channels.
pub async fn bootstrap_org(store: &dyn ConfigStore, org_id: OrgId) -> Result<ConfigVersion> {
    migrate_channels(store, org_id, Vec::new()).await
}

/// Migrate legacy notification channels into an organization's routing tree.
///
/// Each channel becomes a receiver plus a route under the legacy subtree.
/// Channels whose UID is already present are skipped, so re-running a
/// migration is idempotent. The write is conditional on the version that
/// was read; a concurrent writer causes `Error::StaleWrite`.
pub async fn migrate_channels(
    store: &dyn ConfigStore,
    org_id: OrgId,
    channels: Vec<ManagedReceiver>,
) -> Result<ConfigVersion> {
    let (existing, expected_version) = match store.get_config(org_id).await? {
        Some(stored) => {
            let config: RoutingConfig = serde_json::from_value(stored.config)?;
            (Some(config), Some(stored.version))
        }
        None => (None, None),
    };

    let mut tree = LegacyRouteTree::from_config(existing);
    let mut migrated = 0;
    for channel in channels {
        if tree.receiver_for(&channel.uid).is_some() {
            debug!("Channel {} already migrated, skipping", channel.uid);
            continue;
        }
        let label = contact_label(&channel.name);
        let Some(receiver_name) = tree.add_receiver(Some(channel)).map(|r| r.name.clone()) else {
            continue;
        };
        tree.add_route(Some(channel_route(&receiver_name, &label)));
        migrated += 1;
    }

    let config = tree.finalize();
    let version = store
        .save_config(org_id, serde_json::to_value(&config)?, expected_version)
        .await?;

    info!(
        "Migrated {} channel(s) for org {} (config version {})",
        migrated, org_id, version
    );
    Ok(version)
}
