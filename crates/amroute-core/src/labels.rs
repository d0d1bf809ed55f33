//! Reserved label keys and names shared by migration and provisioning.

/// Label carried by the single matcher of the legacy subtree route.
pub const USE_LEGACY_CHANNELS_LABEL: &str = "__legacy_use_channels__";

/// Prefix of the per-channel label that routes alerts to a migrated contact point.
pub const MIGRATED_CONTACT_LABEL_PREFIX: &str = "__legacy_c_";

/// Label holding the title of the folder an alert rule lives in.
pub const FOLDER_TITLE_LABEL: &str = "grafana_folder";

/// Label holding the alert rule name.
pub const ALERT_NAME_LABEL: &str = "alertname";

/// Receiver the default root route points at.
pub const DEFAULT_RECEIVER_NAME: &str = "autogen-contact-point-default";
