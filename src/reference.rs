// src/reference.rs

//! Package references for recipe requirements and published packages
//!
//! References identify a package in a remote repository using the format:
//! `name/version@user/channel`
//!
//! The version component is optional, for tool installers that are
//! published under a single rolling reference:
//!
//! - `sdl2/2.0.9@bincrafters/stable` - pinned library
//! - `ps2_toolchain_installer@rwengine/stable` - unversioned tool
//!
//! # Reference Components
//!
//! - **Name**: The package name
//! - **Version**: The exact version (pinned) or absent
//! - **User**: The publisher namespace in the repository
//! - **Channel**: The maturity channel (`stable`, `testing`, ...)

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A reference to a package in a remote repository
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageReference {
    /// Package name
    pub name: String,
    /// Exact version, if pinned
    pub version: Option<String>,
    /// Publisher namespace
    pub user: String,
    /// Maturity channel
    pub channel: String,
}

impl PackageReference {
    /// Create a pinned reference
    pub fn pinned(
        name: impl Into<String>,
        version: impl Into<String>,
        user: impl Into<String>,
        channel: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: Some(version.into()),
            user: user.into(),
            channel: channel.into(),
        }
    }

    /// Create an unversioned reference
    pub fn unversioned(
        name: impl Into<String>,
        user: impl Into<String>,
        channel: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: None,
            user: user.into(),
            channel: channel.into(),
        }
    }

    /// Parse a reference from `name[/version]@user/channel`
    pub fn parse(s: &str) -> Result<Self, ReferenceParseError> {
        let (package, owner) = s
            .split_once('@')
            .ok_or_else(|| ReferenceParseError::MissingAt(s.to_string()))?;

        let (user, channel) = owner
            .split_once('/')
            .ok_or_else(|| ReferenceParseError::MissingChannel(s.to_string()))?;

        let (name, version) = match package.split_once('/') {
            Some((name, version)) => {
                if version.is_empty() {
                    return Err(ReferenceParseError::EmptyVersion(s.to_string()));
                }
                (name, Some(version))
            }
            None => (package, None),
        };

        if name.is_empty() {
            return Err(ReferenceParseError::EmptyName(s.to_string()));
        }
        if user.is_empty() || channel.is_empty() {
            return Err(ReferenceParseError::EmptyOwner(s.to_string()));
        }

        let valid_chars = |c: char| c.is_alphanumeric() || c == '.' || c == '-' || c == '_' || c == '+';

        for part in [name, user, channel].into_iter().chain(version) {
            if !part.chars().all(valid_chars) {
                return Err(ReferenceParseError::InvalidComponent(part.to_string()));
            }
        }

        Ok(Self {
            name: name.to_string(),
            version: version.map(str::to_string),
            user: user.to_string(),
            channel: channel.to_string(),
        })
    }

    /// Whether the reference names an exact version
    pub fn is_pinned(&self) -> bool {
        self.version.is_some()
    }
}

impl fmt::Display for PackageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}/{}@{}/{}", self.name, version, self.user, self.channel),
            None => write!(f, "{}@{}/{}", self.name, self.user, self.channel),
        }
    }
}

impl FromStr for PackageReference {
    type Err = ReferenceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PackageReference::parse(s)
    }
}

impl Serialize for PackageReference {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PackageReference {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        PackageReference::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Errors that can occur when parsing a package reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceParseError {
    /// Missing @ separator
    MissingAt(String),
    /// Missing / between user and channel
    MissingChannel(String),
    /// Empty package name
    EmptyName(String),
    /// Version separator present but no version
    EmptyVersion(String),
    /// Empty user or channel
    EmptyOwner(String),
    /// Invalid characters in a component
    InvalidComponent(String),
}

impl fmt::Display for ReferenceParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceParseError::MissingAt(s) => write!(f, "Missing '@' in reference: {}", s),
            ReferenceParseError::MissingChannel(s) => {
                write!(f, "Missing '/' between user and channel in reference: {}", s)
            }
            ReferenceParseError::EmptyName(s) => write!(f, "Empty package name in reference: {}", s),
            ReferenceParseError::EmptyVersion(s) => write!(f, "Empty version in reference: {}", s),
            ReferenceParseError::EmptyOwner(s) => {
                write!(f, "Empty user or channel in reference: {}", s)
            }
            ReferenceParseError::InvalidComponent(s) => {
                write!(f, "Invalid reference component: {}", s)
            }
        }
    }
}

impl std::error::Error for ReferenceParseError {}

impl From<ReferenceParseError> for crate::error::Error {
    fn from(e: ReferenceParseError) -> Self {
        crate::error::Error::ParseError(e.to_string())
    }
}
