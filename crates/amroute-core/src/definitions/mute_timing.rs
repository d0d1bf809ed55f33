//! Mute time intervals

use serde::{Deserialize, Serialize};

use super::provenance::{Provenance, Provisionable};
use crate::Result;

/// Resource type under which mute timing provenance is recorded
pub const MUTE_TIMING_RESOURCE_TYPE: &str = "muteTimeInterval";

/// A named, reusable set of time windows during which notifications are muted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MuteTimeInterval {
    pub name: String,

    #[serde(default)]
    pub time_intervals: Vec<TimeInterval>,
}

impl MuteTimeInterval {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            time_intervals: Vec::new(),
        }
    }

    pub fn with_time_interval(mut self, interval: TimeInterval) -> Self {
        self.time_intervals.push(interval);
        self
    }

    /// Structural validation of name and time windows
    pub fn validate(&self) -> Result<()> {
        crate::validation::validate_mute_time_interval(self)
    }
}

/// One window specification. Empty lists mean "any".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeInterval {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub times: Vec<TimeRange>,

    /// `monday` or `monday:friday`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub weekdays: Vec<String>,

    /// `1`, `1:5`, `-1` (last day), `-7:-1`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub days_of_month: Vec<String>,

    /// `january`, `1:3`, `june:august`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub months: Vec<String>,

    /// `2024`, `2024:2026`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub years: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Time-of-day range in `HH:MM`, end exclusive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start_time: String,
    pub end_time: String,
}

impl TimeRange {
    pub fn new(start_time: impl Into<String>, end_time: impl Into<String>) -> Self {
        Self {
            start_time: start_time.into(),
            end_time: end_time.into(),
        }
    }
}

impl Provisionable for MuteTimeInterval {
    fn resource_type(&self) -> &'static str {
        MUTE_TIMING_RESOURCE_TYPE
    }

    fn resource_id(&self) -> String {
        self.name.clone()
    }
}

/// API-facing mute timing: the stored interval plus its provenance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MuteTiming {
    #[serde(flatten)]
    pub interval: MuteTimeInterval,

    #[serde(default)]
    pub provenance: Provenance,
}

impl MuteTiming {
    pub fn new(interval: MuteTimeInterval, provenance: Provenance) -> Self {
        Self {
            interval,
            provenance,
        }
    }

    pub fn name(&self) -> &str {
        &self.interval.name
    }
}

impl Provisionable for MuteTiming {
    fn resource_type(&self) -> &'static str {
        MUTE_TIMING_RESOURCE_TYPE
    }

    fn resource_id(&self) -> String {
        self.interval.resource_id()
    }
}
