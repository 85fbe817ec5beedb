// src/recipe/kitchen/config.rs

//! Configuration types for the Kitchen build driver

use crate::recipe::configuration::BuildConfiguration;
use crate::recipe::metadata::{PackageArtifact, PackageMetadata};
use crate::recipe::requirements::RequirementSet;
use std::collections::BTreeMap;
use std::path::PathBuf;

use super::tools::ToolResolution;

/// Configuration for the Kitchen
#[derive(Debug, Clone)]
pub struct KitchenConfig {
    /// Root of the library's source tree
    pub source_dir: PathBuf,
    /// Where packages are laid out (`<name>/<version>/<package_id>`)
    pub output_dir: PathBuf,
    /// Build directory (a temporary directory if unset)
    pub build_dir: Option<PathBuf>,
    /// Number of parallel jobs
    pub jobs: u32,
    /// cmake executable (found on `PATH` if unset)
    pub cmake_program: Option<PathBuf>,
    /// Keep the temporary build directory after completion (for debugging)
    pub keep_builddir: bool,
    /// Directory holding externally provided build tools
    pub tools_root: PathBuf,
    /// Try to install missing tool requirements before building
    pub auto_install_tools: bool,
    /// User the package reference is published under
    pub user: String,
    /// Channel the package reference is published under
    pub channel: String,
}

impl Default for KitchenConfig {
    fn default() -> Self {
        let jobs = std::thread::available_parallelism()
            .map(|p| p.get() as u32)
            .unwrap_or(4);

        let tools_root = dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("librw-recipe")
            .join("tools");

        Self {
            source_dir: PathBuf::from("."),
            output_dir: PathBuf::from("packages"),
            build_dir: None,
            jobs,
            cmake_program: None,
            keep_builddir: false,
            tools_root,
            auto_install_tools: false, // Tools are provided externally by default
            user: "rwengine".to_string(),
            channel: "testing".to_string(),
        }
    }
}

/// Everything decided about a build before any tool runs
#[derive(Debug, Clone)]
pub struct BuildPlan {
    /// The validated configuration
    pub configuration: BuildConfiguration,
    /// Requirements resolved for its platform
    pub requirements: RequirementSet,
    /// Platform identifier, computed once for both the build and the metadata
    pub platform_identifier: String,
    /// Definitions handed to the configure step
    pub definitions: BTreeMap<String, String>,
    /// Configuration hash
    pub package_id: String,
}

/// Result of cooking a recipe
#[derive(Debug)]
pub struct CookResult {
    /// The installed package
    pub artifact: PackageArtifact,
    /// Metadata exported for consumers
    pub metadata: PackageMetadata,
    /// Requirement set of the build
    pub requirements: RequirementSet,
    /// Tool requirement resolution result
    pub tools: ToolResolution,
    /// Digest of the package tree
    pub digest: String,
    /// Build log
    pub log: String,
}
