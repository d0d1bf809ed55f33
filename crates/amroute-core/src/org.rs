//! Organization identifiers
//!
//! Every routing configuration, mute timing and provenance record is scoped
//! to exactly one organization.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Identifier of the organization that owns a routing configuration.
///
/// Organization IDs are positive integers; zero and negative values are
/// rejected at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct OrgId(i64);

impl OrgId {
    /// Create an org ID, rejecting non-positive values
    pub fn new(id: i64) -> Result<Self> {
        if id <= 0 {
            return Err(Error::InvalidOrg(format!(
                "Organization ID must be positive, got {}",
                id
            )));
        }
        Ok(Self(id))
    }

    /// Get the raw numeric ID
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for OrgId {
    type Error = Error;

    fn try_from(id: i64) -> Result<Self> {
        Self::new(id)
    }
}

impl From<OrgId> for i64 {
    fn from(org_id: OrgId) -> Self {
        org_id.0
    }
}

impl fmt::Display for OrgId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for OrgId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let id = s
            .trim()
            .parse::<i64>()
            .map_err(|e| Error::InvalidOrg(format!("Invalid organization ID '{}': {}", s, e)))?;
        Self::new(id)
    }
}
