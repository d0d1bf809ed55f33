//! Notification receivers (contact points)

use serde::{Deserialize, Serialize};

/// A named notification destination grouping one or more integrations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Receiver {
    pub name: String,

    #[serde(
        default,
        rename = "grafana_managed_receiver_configs",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub integrations: Vec<ManagedReceiver>,
}

impl Receiver {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            integrations: Vec::new(),
        }
    }
}

/// A single notification integration. The `uid` survives renames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManagedReceiver {
    pub uid: String,

    pub name: String,

    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub disable_resolve_message: bool,

    /// Integration parameters, opaque to routing
    #[serde(default)]
    pub settings: serde_json::Value,
}

impl ManagedReceiver {
    pub fn new(uid: impl Into<String>, name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            name: name.into(),
            kind: kind.into(),
            disable_resolve_message: false,
            settings: serde_json::Value::Object(Default::default()),
        }
    }
}
