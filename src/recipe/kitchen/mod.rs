// src/recipe/kitchen/mod.rs

//! Kitchen: the build driver for cooking a recipe configuration
//!
//! The Kitchen turns a recipe and one build configuration into an
//! installed package. Each stage returns a result and the pipeline stops
//! at the first failure, so cheap checks always run before expensive or
//! irreversible steps:
//! - Validate the configuration and resolve its requirements
//! - Ensure tool requirements are available
//! - Configure and build the library with platform-derived definitions
//! - Install into the package layout and export metadata

mod build_tool;
mod config;
mod cook;
pub mod tools;

pub use build_tool::{BuildTool, CMake};
pub use config::{BuildPlan, CookResult, KitchenConfig};
pub use cook::BuiltTree;
pub use tools::{DirectoryResolver, NoopResolver, ToolResolution, ToolResolver};

use crate::error::{Error, Result};
use crate::recipe::configuration::BuildConfiguration;
use crate::recipe::format::Recipe;
use crate::recipe::metadata::{PackageArtifact, PackageMetadata, digest_tree, export_metadata};
use crate::recipe::requirements::{RequirementSet, validate};
use crate::settings::Os;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Definition carrying the platform identifier
pub const PLATFORM_DEFINITION: &str = "LIBRW_PLATFORM";

/// Definition enabling the library's install rules
pub const INSTALL_DEFINITION: &str = "LIBRW_INSTALL";

/// Definition enabling the library's auxiliary tools
pub const TOOLS_DEFINITION: &str = "LIBRW_TOOLS";

/// Definitions handed to the configure step of a configuration
///
/// The platform identifier is passed in rather than derived here so the
/// build and the exported metadata always use the same value.
pub fn derive_definitions(
    config: &BuildConfiguration,
    platform_identifier: &str,
) -> BTreeMap<String, String> {
    let on_off = |flag: bool| if flag { "ON" } else { "OFF" }.to_string();

    let mut definitions = BTreeMap::new();
    definitions.insert(PLATFORM_DEFINITION.to_string(), platform_identifier.to_string());
    definitions.insert(INSTALL_DEFINITION.to_string(), on_off(true));
    definitions.insert(TOOLS_DEFINITION.to_string(), on_off(true));
    definitions.insert(
        "CMAKE_BUILD_TYPE".to_string(),
        config.settings.build_type.as_str().to_string(),
    );
    definitions.insert("BUILD_SHARED_LIBS".to_string(), on_off(config.options.shared));

    // fPIC has no meaning for Windows toolchains
    if config.settings.os != Os::Windows {
        definitions.insert(
            "CMAKE_POSITION_INDEPENDENT_CODE".to_string(),
            on_off(config.options.fpic),
        );
    }

    definitions
}

/// The Kitchen: where recipes are cooked
pub struct Kitchen {
    pub(crate) config: KitchenConfig,
    tool: Arc<dyn BuildTool>,
    /// Optional resolver for tool requirements
    resolver: Option<Arc<dyn ToolResolver>>,
}

impl Kitchen {
    /// Create a new Kitchen with the given configuration and build tool
    pub fn new(config: KitchenConfig, tool: Arc<dyn BuildTool>) -> Self {
        Self {
            config,
            tool,
            resolver: None,
        }
    }

    /// Create a new Kitchen with a tool requirement resolver
    pub fn with_resolver(
        config: KitchenConfig,
        tool: Arc<dyn BuildTool>,
        resolver: Arc<dyn ToolResolver>,
    ) -> Self {
        Self {
            config,
            tool,
            resolver: Some(resolver),
        }
    }

    /// Create a Kitchen that drives cmake and looks for tools in the
    /// configured tools directory
    pub fn with_cmake(config: KitchenConfig) -> Result<Self> {
        let tool = match &config.cmake_program {
            Some(program) => CMake::new(program),
            None => CMake::locate()?,
        };
        let tool = Arc::new(tool);
        let resolver = Arc::new(DirectoryResolver::new(config.tools_root.clone()));
        Ok(Self::with_resolver(config, tool, resolver))
    }

    /// Set the tool requirement resolver
    pub fn set_resolver(&mut self, resolver: Arc<dyn ToolResolver>) {
        self.resolver = Some(resolver);
    }

    /// The Kitchen's configuration
    pub fn config(&self) -> &KitchenConfig {
        &self.config
    }

    /// Final location of a package
    pub fn package_dir(&self, recipe: &Recipe, package_id: &str) -> PathBuf {
        self.config
            .output_dir
            .join(&recipe.package.name)
            .join(&recipe.package.version)
            .join(package_id)
    }

    /// Validate a configuration and decide everything about its build
    ///
    /// Runs no tools and touches no files.
    pub fn plan(&self, config: &BuildConfiguration) -> Result<BuildPlan> {
        validate(config)?;

        let platform = config.platform();
        let requirements = RequirementSet::for_platform(platform);
        let platform_identifier = platform.identifier();
        let definitions = derive_definitions(config, &platform_identifier);

        debug!(
            "Planned {} with {} tool and {} library requirement(s)",
            config,
            requirements.tools.len(),
            requirements.libraries.len()
        );

        Ok(BuildPlan {
            configuration: config.clone(),
            requirements,
            platform_identifier,
            definitions,
            package_id: config.package_id(),
        })
    }

    /// Make sure the tool requirements of a plan are available
    ///
    /// Missing tools are installed if a resolver is configured and
    /// `auto_install_tools` is enabled. Anything still missing is a
    /// [`Error::ToolRequirementError`].
    pub fn ensure_tools(&self, plan: &BuildPlan) -> Result<ToolResolution> {
        let tools = &plan.requirements.tools;

        if tools.is_empty() {
            debug!("No tool requirements for platform {}", plan.configuration.platform());
            return Ok(ToolResolution::default());
        }

        let resolver = match &self.resolver {
            Some(r) => r,
            None => {
                // No resolver configured - the caller is expected to have provided the tools
                debug!("No tool resolver configured, assuming all tools are available");
                return Ok(ToolResolution {
                    already_available: tools.clone(),
                    ..Default::default()
                });
            }
        };

        let missing = resolver.check_missing(tools)?;
        let already_available: Vec<_> = tools
            .iter()
            .filter(|t| !missing.contains(t))
            .cloned()
            .collect();

        if missing.is_empty() {
            info!("All tool requirements are available");
            return Ok(ToolResolution {
                already_available,
                ..Default::default()
            });
        }

        let newly_installed = if self.config.auto_install_tools {
            info!(
                "Installing missing tools: {}",
                missing.iter().map(|t| t.to_string()).collect::<Vec<_>>().join(", ")
            );
            resolver.install(&missing)?
        } else {
            Vec::new()
        };

        let unresolved: Vec<_> = missing
            .iter()
            .filter(|t| !newly_installed.contains(t))
            .cloned()
            .collect();

        if !unresolved.is_empty() {
            let names: Vec<String> = unresolved.iter().map(|t| t.to_string()).collect();
            warn!("Could not provide tool requirements: {}", names.join(", "));
            return Err(Error::ToolRequirementError(names.join(", ")));
        }

        Ok(ToolResolution {
            already_available,
            newly_installed,
            unresolved,
        })
    }

    /// Validate, resolve, configure and build one configuration
    pub fn build(&self, config: &BuildConfiguration) -> Result<BuiltTree> {
        // Phase 0: Validate and plan
        let plan = self.plan(config)?;

        // Phase 1: Tool requirements
        let tools = self.ensure_tools(&plan)?;

        // Phase 2: Simmer
        info!("Simmering: building {} ({})", config, plan.platform_identifier);
        cook::simmer(self, plan, tools)
    }

    /// Install a built tree into the package layout
    ///
    /// Repeating this for the same built tree yields an identical package.
    pub fn package(&self, recipe: &Recipe, built: &BuiltTree) -> Result<PackageArtifact> {
        info!("Plating: packaging {}", recipe.package.name);
        cook::plate(self, recipe, built)
    }

    /// Metadata a package exports to consumers
    pub fn export_metadata(&self, artifact: &PackageArtifact) -> PackageMetadata {
        export_metadata(artifact)
    }

    /// Cook a recipe configuration into a package
    ///
    /// This is the main entry point for local builds.
    pub fn cook(&self, recipe: &Recipe, config: &BuildConfiguration) -> Result<CookResult> {
        info!(
            "Cooking {} version {} for {}",
            recipe.package.name, recipe.package.version, config
        );

        let built = self.build(config)?;
        let artifact = self.package(recipe, &built)?;
        let metadata = self.export_metadata(&artifact);
        let digest = digest_tree(&artifact.root)?;

        info!(
            "Cooked {} ({}) into {}",
            artifact.reference,
            artifact.platform_identifier,
            artifact.root.display()
        );

        Ok(CookResult {
            requirements: built.plan.requirements.clone(),
            tools: built.tools.clone(),
            log: built.log.clone(),
            artifact,
            metadata,
            digest,
        })
    }
}
