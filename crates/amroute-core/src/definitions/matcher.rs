//! Label matchers attached to routes

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a matcher compares a label value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchType {
    #[serde(rename = "=")]
    Equal,
    #[serde(rename = "!=")]
    NotEqual,
    #[serde(rename = "=~")]
    Regexp,
    #[serde(rename = "!~")]
    NotRegexp,
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::Equal => "=",
            MatchType::NotEqual => "!=",
            MatchType::Regexp => "=~",
            MatchType::NotRegexp => "!~",
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single label condition.
///
/// Serialized in the compact object-matcher form `["name", "=", "value"]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(
    from = "(String, MatchType, String)",
    into = "(String, MatchType, String)"
)]
pub struct Matcher {
    pub name: String,
    pub match_type: MatchType,
    pub value: String,
}

impl Matcher {
    pub fn new(name: impl Into<String>, match_type: MatchType, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            match_type,
            value: value.into(),
        }
    }

    /// Shorthand for an equality matcher
    pub fn equal(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, MatchType::Equal, value)
    }

    pub fn is_equal(&self) -> bool {
        self.match_type == MatchType::Equal
    }
}

impl From<(String, MatchType, String)> for Matcher {
    fn from((name, match_type, value): (String, MatchType, String)) -> Self {
        Self {
            name,
            match_type,
            value,
        }
    }
}

impl From<Matcher> for (String, MatchType, String) {
    fn from(matcher: Matcher) -> Self {
        (matcher.name, matcher.match_type, matcher.value)
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{:?}", self.name, self.match_type, self.value)
    }
}
