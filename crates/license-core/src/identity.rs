//! Artifact identity: the `group:name:version` triple.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;

/// Version token that matches any resolved version in a manifest entry.
pub const WILDCARD_VERSION: &str = "+";

/// How two identities are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// All three fields must be equal.
    Exact,
    /// A wildcard version on either side matches any version.
    Declared,
}

/// Canonical (group, name, version) key of a dependency.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArtifactId {
    pub group: String,
    pub name: String,
    pub version: String,
}

impl ArtifactId {
    pub fn new(
        group: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
            version: version.into(),
        }
    }

    /// Parse a `group:name:version` descriptor.
    ///
    /// Anything after the second colon belongs to the version, so
    /// `parse(id.to_string()) == id` holds for every identity.
    pub fn parse(descriptor: &str) -> Result<Self, CoreError> {
        let mut parts = descriptor.splitn(3, ':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(group), Some(name), Some(version)) => Ok(Self::new(group, name, version)),
            _ => Err(CoreError::MalformedIdentity(descriptor.to_string())),
        }
    }

    /// Copy of this identity with the version replaced by [`WILDCARD_VERSION`].
    pub fn with_wildcard_version(&self) -> Self {
        Self::new(self.group.clone(), self.name.clone(), WILDCARD_VERSION)
    }

    pub fn is_wildcard(&self) -> bool {
        self.version == WILDCARD_VERSION
    }

    pub fn matches(&self, other: &ArtifactId, mode: MatchMode) -> bool {
        if self.group != other.group || self.name != other.name {
            return false;
        }
        match mode {
            MatchMode::Exact => self.version == other.version,
            MatchMode::Declared => {
                self.is_wildcard() || other.is_wildcard() || self.version == other.version
            }
        }
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.name, self.version)
    }
}

impl FromStr for ArtifactId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ArtifactId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ArtifactId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let descriptor = String::deserialize(deserializer)?;
        Self::parse(&descriptor).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_descriptor() {
        let id = ArtifactId::parse("com.squareup.okhttp3:okhttp:4.12.0").unwrap();
        assert_eq!(id.group, "com.squareup.okhttp3");
        assert_eq!(id.name, "okhttp");
        assert_eq!(id.version, "4.12.0");
    }

    #[test]
    fn test_parse_rejects_short_descriptor() {
        assert!(matches!(
            ArtifactId::parse("com.example:lib"),
            Err(CoreError::MalformedIdentity(d)) if d == "com.example:lib"
        ));
        assert!(ArtifactId::parse("lib").is_err());
        assert!(ArtifactId::parse("").is_err());
    }

    #[test]
    fn test_round_trip() {
        for descriptor in ["a:b:1.0", "org.x:y:+", "g:n:1.0:sources", "::"] {
            let id = ArtifactId::parse(descriptor).unwrap();
            assert_eq!(id.to_string(), descriptor);
            assert_eq!(ArtifactId::parse(&id.to_string()).unwrap(), id);
        }
    }

    #[test]
    fn test_wildcard_is_idempotent() {
        let id = ArtifactId::new("com.a", "lib", "1.2.0");
        let once = id.with_wildcard_version();
        assert_eq!(once.version, WILDCARD_VERSION);
        assert_eq!(once.with_wildcard_version(), once);
        // original untouched
        assert_eq!(id.version, "1.2.0");
    }

    #[test]
    fn test_exact_match() {
        let a = ArtifactId::new("com.a", "lib", "1.2.0");
        assert!(a.matches(&ArtifactId::new("com.a", "lib", "1.2.0"), MatchMode::Exact));
        assert!(!a.matches(&ArtifactId::new("com.a", "lib", "1.3.0"), MatchMode::Exact));
        assert!(!a.matches(&a.with_wildcard_version(), MatchMode::Exact));
    }

    #[test]
    fn test_declared_match() {
        let resolved = ArtifactId::new("com.a", "lib", "1.2.0");
        let declared = ArtifactId::new("com.a", "lib", "+");

        assert!(declared.matches(&resolved, MatchMode::Declared));
        assert!(resolved.matches(&declared, MatchMode::Declared));
        assert!(!resolved.matches(&ArtifactId::new("com.a", "lib", "1.0.0"), MatchMode::Declared));
        assert!(!declared.matches(&ArtifactId::new("com.b", "lib", "1.2.0"), MatchMode::Declared));
        assert!(!declared.matches(&ArtifactId::new("com.a", "other", "+"), MatchMode::Declared));
    }

    #[test]
    fn test_serde_as_descriptor_string() {
        let id = ArtifactId::new("com.a", "lib", "+");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"com.a:lib:+\"");

        let back: ArtifactId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<ArtifactId>("\"broken\"").is_err());
    }
}
