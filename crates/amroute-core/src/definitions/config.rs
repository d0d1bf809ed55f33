//! Per-organization routing configuration root

use serde::{Deserialize, Serialize};

use super::mute_timing::MuteTimeInterval;
use super::receiver::Receiver;
use super::route::Route;
use crate::{Error, Result};

/// Everything the routing engine stores for one organization
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoutingConfig {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub receivers: Vec<Receiver>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<Route>,

    /// `None` when the collection was never created, as opposed to empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mute_time_intervals: Option<Vec<MuteTimeInterval>>,
}

impl RoutingConfig {
    /// Position and definition of the mute time interval named `name`
    pub fn mute_time_interval(&self, name: &str) -> Option<(usize, &MuteTimeInterval)> {
        self.mute_time_intervals
            .as_deref()?
            .iter()
            .enumerate()
            .find(|(_, mti)| mti.name == name)
    }

    /// Whether any route in the tree references the named interval
    pub fn is_mute_interval_in_use(&self, name: &str) -> bool {
        self.route
            .as_ref()
            .is_some_and(|root| root.is_mute_interval_in_use(name))
    }

    pub fn receiver(&self, name: &str) -> Option<&Receiver> {
        self.receivers.iter().find(|r| r.name == name)
    }

    /// Check that every mute interval referenced from the route tree exists.
    pub fn validate_references(&self) -> Result<()> {
        let Some(root) = &self.route else {
            return Ok(());
        };

        for route in root {
            for name in &route.mute_time_intervals {
                if self.mute_time_interval(name).is_none() {
                    return Err(Error::InvalidInput(format!(
                        "route for receiver '{}' references unknown mute time interval '{}'",
                        route.receiver, name
                    )));
                }
            }
        }
        Ok(())
    }
}
