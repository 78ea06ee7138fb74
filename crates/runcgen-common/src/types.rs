//! Domain primitive types used across the runcgen workspace.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_PLATFORM_SEGMENT;

/// Name of the project that owns a set of services.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectName(String);

impl ProjectName {
    /// Creates a project name from a string value.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the inner string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An `os[/arch[/variant]]` platform tag such as `linux/arm64/v8`.
///
/// Parsing never fails; the original string is kept verbatim for display
/// and for the composite spec key. Only the OS component drives defaults.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Platform {
    raw: String,
    os: String,
}

impl Platform {
    /// Parses a platform tag.
    #[must_use]
    pub fn parse(tag: impl Into<String>) -> Self {
        let raw = tag.into();
        let os = raw.split('/').next().unwrap_or_default().to_string();
        Self { raw, os }
    }

    /// Maps an external tag to a platform, treating the empty string as
    /// "no platform specified".
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        if tag.is_empty() {
            None
        } else {
            Some(Self::parse(tag))
        }
    }

    /// Operating system component (`linux`, `windows`, ...).
    #[must_use]
    pub fn os(&self) -> &str {
        &self.os
    }

    /// Returns the tag exactly as it was given.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl From<String> for Platform {
    fn from(tag: String) -> Self {
        Self::parse(tag)
    }
}

impl From<Platform> for String {
    fn from(platform: Platform) -> Self {
        platform.raw
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Composite key identifying one compiled spec: a service and the platform
/// variant its exec configuration was registered for.
///
/// The untagged variant is `None`, so a platform literally named `default`
/// is a different key even though both render as `<service>/default`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpecKey {
    /// Service name.
    pub service: String,
    /// Platform tag of the originating configuration.
    pub platform: Option<Platform>,
}

impl SpecKey {
    /// Creates a key for a service and an optional platform tag.
    #[must_use]
    pub fn new(service: impl Into<String>, platform: Option<Platform>) -> Self {
        Self {
            service: service.into(),
            platform,
        }
    }

    /// Returns the platform segment of the rendered key.
    #[must_use]
    pub fn platform_segment(&self) -> &str {
        self.platform
            .as_ref()
            .map_or(DEFAULT_PLATFORM_SEGMENT, Platform::as_str)
    }
}

impl fmt::Display for SpecKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.service, self.platform_segment())
    }
}
