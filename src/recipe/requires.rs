//! Upstream package requirements.
//!
//! References follow the `name/version[@user/channel]` convention used by
//! Conan remotes. The recipe declares a fixed requirement list; nothing
//! here resolves or fetches them.

use std::fmt;
use std::str::FromStr;

use semver::Version;
use thiserror::Error;

/// A reference to one required package at an exact version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageReference {
    pub name: String,
    pub version: Version,
    pub user: Option<String>,
    pub channel: Option<String>,
}

impl PackageReference {
    pub fn new(name: impl Into<String>, version: Version) -> Self {
        PackageReference {
            name: name.into(),
            version,
            user: None,
            channel: None,
        }
    }

    /// Pin the reference to a user/channel namespace on the remote.
    pub fn with_channel(mut self, user: impl Into<String>, channel: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self.channel = Some(channel.into());
        self
    }
}

impl fmt::Display for PackageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.version)?;
        if let (Some(user), Some(channel)) = (&self.user, &self.channel) {
            write!(f, "@{}/{}", user, channel)?;
        }
        Ok(())
    }
}

impl FromStr for PackageReference {
    type Err = ReferenceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, rest) = s
            .split_once('/')
            .ok_or_else(|| ReferenceParseError::MissingVersion(s.to_string()))?;
        if name.is_empty() || rest.is_empty() {
            return Err(ReferenceParseError::MissingVersion(s.to_string()));
        }

        let (version, channel) = match rest.split_once('@') {
            Some((version, channel)) => (version, Some(channel)),
            None => (rest, None),
        };

        let version =
            Version::parse(version).map_err(|source| ReferenceParseError::InvalidVersion {
                reference: s.to_string(),
                source,
            })?;

        let mut reference = PackageReference::new(name, version);
        if let Some(channel) = channel {
            let (user, channel) = channel
                .split_once('/')
                .ok_or_else(|| ReferenceParseError::InvalidChannel(s.to_string()))?;
            if user.is_empty() || channel.is_empty() {
                return Err(ReferenceParseError::InvalidChannel(s.to_string()));
            }
            reference = reference.with_channel(user, channel);
        }
        Ok(reference)
    }
}

/// A package reference string failed to parse.
#[derive(Debug, Error)]
pub enum ReferenceParseError {
    #[error("package reference `{0}` is missing a version (expected name/version)")]
    MissingVersion(String),

    #[error("package reference `{reference}` has an invalid version")]
    InvalidVersion {
        reference: String,
        #[source]
        source: semver::Error,
    },

    #[error("package reference `{0}` has an invalid channel (expected @user/channel)")]
    InvalidChannel(String),
}

/// The packages every build of the recipe requires.
pub fn default_requires() -> Vec<PackageReference> {
    vec![
        PackageReference::new("boost", Version::new(1, 73, 0)),
        PackageReference::new("grpc", Version::new(1, 29, 1)).with_channel("inexorgame", "stable"),
        PackageReference::new("gtest", Version::new(1, 10, 0)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_round_trips() {
        for reference in default_requires() {
            let text = reference.to_string();
            let parsed: PackageReference = text.parse().unwrap();
            assert_eq!(parsed, reference);
        }
    }

    #[test]
    fn test_parse_plain_reference() {
        let reference: PackageReference = "boost/1.73.0".parse().unwrap();
        assert_eq!(reference.name, "boost");
        assert_eq!(reference.version, Version::new(1, 73, 0));
        assert_eq!(reference.user, None);
    }

    #[test]
    fn test_parse_channelled_reference() {
        let reference: PackageReference = "grpc/1.29.1@inexorgame/stable".parse().unwrap();
        assert_eq!(reference.user.as_deref(), Some("inexorgame"));
        assert_eq!(reference.channel.as_deref(), Some("stable"));
    }

    #[test]
    fn test_parse_rejects_malformed_references() {
        assert!(matches!(
            "boost".parse::<PackageReference>(),
            Err(ReferenceParseError::MissingVersion(_))
        ));
        assert!(matches!(
            "boost/not-a-version".parse::<PackageReference>(),
            Err(ReferenceParseError::InvalidVersion { .. })
        ));
        assert!(matches!(
            "grpc/1.29.1@inexorgame".parse::<PackageReference>(),
            Err(ReferenceParseError::InvalidChannel(_))
        ));
    }

    #[test]
    fn test_default_requires_pinned() {
        let requires = default_requires();
        assert_eq!(requires.len(), 3);
        assert_eq!(requires[1].to_string(), "grpc/1.29.1@inexorgame/stable");
    }
}
