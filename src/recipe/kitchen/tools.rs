// src/recipe/kitchen/tools.rs

//! Tool requirement resolution for recipe builds

use crate::error::Result;
use crate::reference::PackageReference;
use std::path::PathBuf;
use tracing::debug;

/// Trait for checking and providing build-time tool requirements
///
/// This keeps the Kitchen decoupled from how tools such as toolchain
/// installers are obtained on a build machine.
pub trait ToolResolver: Send + Sync {
    /// Check which tools are missing
    fn check_missing(&self, tools: &[PackageReference]) -> Result<Vec<PackageReference>>;

    /// Install the specified tools
    ///
    /// Returns the tools that were actually installed.
    fn install(&self, tools: &[PackageReference]) -> Result<Vec<PackageReference>>;
}

/// A no-op resolver that assumes all tools are available
///
/// Use this in a pre-provisioned build container.
pub struct NoopResolver;

impl ToolResolver for NoopResolver {
    fn check_missing(&self, _tools: &[PackageReference]) -> Result<Vec<PackageReference>> {
        Ok(Vec::new())
    }

    fn install(&self, _tools: &[PackageReference]) -> Result<Vec<PackageReference>> {
        Ok(Vec::new())
    }
}

/// Resolver for tools unpacked into a directory, one subdirectory per tool
///
/// A tool is available when `<root>/<name>` exists. Tools cannot be
/// installed through this resolver; they are provisioned externally.
pub struct DirectoryResolver {
    root: PathBuf,
}

impl DirectoryResolver {
    /// Create a resolver for a tools directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Location a tool is expected at
    pub fn tool_path(&self, tool: &PackageReference) -> PathBuf {
        self.root.join(&tool.name)
    }
}

impl ToolResolver for DirectoryResolver {
    fn check_missing(&self, tools: &[PackageReference]) -> Result<Vec<PackageReference>> {
        Ok(tools
            .iter()
            .filter(|tool| {
                let path = self.tool_path(tool);
                debug!("Looking for {} at {}", tool, path.display());
                !path.is_dir()
            })
            .cloned()
            .collect())
    }

    fn install(&self, _tools: &[PackageReference]) -> Result<Vec<PackageReference>> {
        Ok(Vec::new())
    }
}

/// Result of tool requirement resolution
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ToolResolution {
    /// Tools that were already available
    pub already_available: Vec<PackageReference>,
    /// Tools that were installed for this build
    pub newly_installed: Vec<PackageReference>,
    /// Tools that could not be provided
    pub unresolved: Vec<PackageReference>,
}
