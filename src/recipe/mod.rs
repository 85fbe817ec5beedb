// src/recipe/mod.rs

//! Recipe system for building librw packages
//!
//! A recipe describes the package (name, version, license, metadata) and
//! the option defaults. A build configuration pairs host settings with
//! option values; the Kitchen turns one configuration into an installed
//! package.
//!
//! # Culinary Terminology
//!
//! - **Recipe**: The package description (like a recipe card)
//! - **Cook**: Build and package one configuration
//! - **Kitchen**: The build driver
//! - **Simmer**: Configure and build
//! - **Plate**: Install into the package layout
//!
//! # Example Recipe
//!
//! ```toml
//! [package]
//! name = "librw"
//! version = "master"
//! license = "MIT"
//!
//! [options]
//! shared = false
//! fPIC = true
//! platform = "gl3"
//! ```

mod configuration;
mod format;
mod kitchen;
pub mod metadata;
mod options;
pub mod parser;
mod platform;
pub mod requirements;

pub use configuration::BuildConfiguration;
pub use format::{LIBRW_RECIPE, PackageSection, Recipe, SourceSection};
pub use kitchen::{
    BuildPlan, BuildTool, BuiltTree, CMake, CookResult, DirectoryResolver, INSTALL_DEFINITION,
    Kitchen, KitchenConfig, NoopResolver, PLATFORM_DEFINITION, TOOLS_DEFINITION, ToolResolution,
    ToolResolver, derive_definitions,
};
pub use metadata::{PackageArtifact, PackageMetadata, export_metadata};
pub use options::RecipeOptions;
pub use parser::{default_recipe, parse_recipe, parse_recipe_file, validate_recipe};
pub use platform::Platform;
pub use requirements::{RequirementSet, validate};
