//! Fix-version translation between GitHub boards and Jira
//!
//! GitHub backport boards use plain versions such as `3.20.4` as status
//! values. Jira stores released versions as `3.20.4.GA` and searches a
//! minor stream with `fixVersion ~ "3.20.*"`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A fix version as it appears on a GitHub backport board
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FixVersion(String);

impl FixVersion {
    pub fn new(version: impl Into<String>) -> Self {
        Self(version.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The Jira fix-version name, e.g. `3.20.4` -> `3.20.4.GA`
    pub fn exact(&self) -> String {
        format!("{}.GA", self.0)
    }

    /// Wildcard matching the whole minor stream, e.g. `3.20.4` -> `3.20.*`
    ///
    /// Versions without a minor segment get `.*` appended as-is.
    pub fn major_minor_wildcard(&self) -> String {
        let mut parts = self.0.split('.');
        match (parts.next(), parts.next()) {
            (Some(major), Some(minor)) => format!("{}.{}.*", major, minor),
            _ => format!("{}.*", self.0),
        }
    }
}

impl fmt::Display for FixVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FixVersion {
    fn from(version: &str) -> Self {
        Self::new(version)
    }
}

impl From<String> for FixVersion {
    fn from(version: String) -> Self {
        Self(version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_form() {
        assert_eq!(FixVersion::new("3.20.4").exact(), "3.20.4.GA");
    }

    #[test]
    fn test_wildcard_three_segments() {
        assert_eq!(FixVersion::new("3.20.4").major_minor_wildcard(), "3.20.*");
    }

    #[test]
    fn test_wildcard_two_segments() {
        assert_eq!(FixVersion::new("3.27").major_minor_wildcard(), "3.27.*");
    }

    #[test]
    fn test_wildcard_single_segment() {
        assert_eq!(FixVersion::new("3").major_minor_wildcard(), "3.*");
    }

    #[test]
    fn test_wildcard_four_segments() {
        assert_eq!(
            FixVersion::new("2.13.9.SP1").major_minor_wildcard(),
            "2.13.*"
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(FixVersion::from("3.15.1").to_string(), "3.15.1");
    }
}
