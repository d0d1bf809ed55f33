//! Provenance tags and resource identities

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Authority that last wrote a resource
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provenance {
    #[default]
    #[serde(rename = "")]
    None,
    #[serde(rename = "api")]
    Api,
    #[serde(rename = "file")]
    File,
    #[serde(rename = "converted_prometheus")]
    ConvertedPrometheus,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::None => "",
            Provenance::Api => "api",
            Provenance::File => "file",
            Provenance::ConvertedPrometheus => "converted_prometheus",
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provenance {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "" | "none" => Ok(Provenance::None),
            "api" => Ok(Provenance::Api),
            "file" => Ok(Provenance::File),
            "converted_prometheus" => Ok(Provenance::ConvertedPrometheus),
            other => Err(Error::InvalidInput(format!(
                "Unknown provenance '{}'",
                other
            ))),
        }
    }
}

/// Identity of a provisioned resource within an organization
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceRef {
    pub resource_type: String,
    pub resource_id: String,
}

impl ResourceRef {
    pub fn new(resource_type: impl Into<String>, resource_id: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            resource_id: resource_id.into(),
        }
    }
}

/// Resources whose provenance is tracked
pub trait Provisionable {
    fn resource_type(&self) -> &'static str;

    fn resource_id(&self) -> String;

    fn resource_ref(&self) -> ResourceRef {
        ResourceRef::new(self.resource_type(), self.resource_id())
    }
}
