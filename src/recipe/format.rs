// src/recipe/format.rs

//! Recipe file format definitions
//!
//! Recipes are TOML files that describe one library, its option defaults,
//! and where its license lives in the source tree. Platform rules are not
//! part of the file; they live in the platform table.

use crate::recipe::options::RecipeOptions;
use crate::reference::PackageReference;
use serde::{Deserialize, Serialize};

/// The recipe shipped with this crate for the librw graphics library
pub const LIBRW_RECIPE: &str = include_str!("../../recipes/librw.toml");

/// A complete recipe for building and packaging one library
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    /// Package metadata
    pub package: PackageSection,

    /// Option defaults
    #[serde(default)]
    pub options: RecipeOptions,

    /// Source tree layout
    #[serde(default)]
    pub source: SourceSection,
}

impl Recipe {
    /// Reference this recipe is published under for a user and channel
    pub fn reference(&self, user: &str, channel: &str) -> PackageReference {
        PackageReference::pinned(&self.package.name, &self.package.version, user, channel)
    }

    /// Name of the include subdirectory the library installs its headers into
    pub fn include_subdir(&self) -> &str {
        &self.package.name
    }
}

/// Package metadata section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageSection {
    /// Package name
    pub name: String,

    /// Package version
    pub version: String,

    /// License identifier (SPDX)
    #[serde(default)]
    pub license: Option<String>,

    /// Maintainer contact
    #[serde(default)]
    pub author: Option<String>,

    /// Upstream project URL
    #[serde(default)]
    pub url: Option<String>,

    /// Short description
    #[serde(default)]
    pub description: Option<String>,

    /// Search topics
    #[serde(default)]
    pub topics: Vec<String>,
}

/// Source tree section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSection {
    /// License file, relative to the source root
    #[serde(default = "default_license_file")]
    pub license_file: String,
}

impl Default for SourceSection {
    fn default() -> Self {
        Self {
            license_file: default_license_file(),
        }
    }
}

fn default_license_file() -> String {
    "LICENSE".to_string()
}
