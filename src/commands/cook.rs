// src/commands/cook.rs

//! Cook command - build a package from the recipe

use super::{configuration_from_args, load_recipe};
use crate::cli::ConfigArgs;
use anyhow::{Context, Result};
use librw_recipe::{Kitchen, KitchenConfig};
use std::path::PathBuf;
use tracing::info;

/// Local build settings of the cook command
#[derive(Debug, Clone)]
pub struct CookOptions {
    pub source_dir: String,
    pub output_dir: String,
    pub build_dir: Option<String>,
    pub jobs: Option<u32>,
    pub keep_builddir: bool,
    pub cmake: Option<String>,
    pub tools_root: Option<String>,
    pub install_tools: bool,
}

/// Cook one configuration into a package
pub fn cmd_cook(args: &ConfigArgs, opts: &CookOptions) -> Result<()> {
    let recipe = load_recipe(args.recipe.as_deref())?;
    let config = configuration_from_args(&recipe, args)?;

    println!("Recipe: {} version {}", recipe.package.name, recipe.package.version);
    println!("Configuration: {}", config);

    let mut kitchen_config = KitchenConfig {
        source_dir: PathBuf::from(&opts.source_dir),
        output_dir: PathBuf::from(&opts.output_dir),
        build_dir: opts.build_dir.as_ref().map(PathBuf::from),
        keep_builddir: opts.keep_builddir,
        auto_install_tools: opts.install_tools,
        ..Default::default()
    };
    if let Some(j) = opts.jobs {
        kitchen_config.jobs = j;
    }
    if let Some(root) = &opts.tools_root {
        kitchen_config.tools_root = PathBuf::from(root);
    }

    if let Some(program) = &opts.cmake {
        kitchen_config.cmake_program = Some(PathBuf::from(program));
    }

    let kitchen = Kitchen::with_cmake(kitchen_config).context("Failed to set up the build tool")?;

    info!("Cooking {} with {} job(s)", config, kitchen.config().jobs);
    println!("Cooking...");

    let result = kitchen
        .cook(&recipe, &config)
        .with_context(|| format!("Failed to cook {}", config))?;

    for tool in &result.tools.newly_installed {
        println!("Installed build tool: {}", tool);
    }

    println!();
    println!("[COMPLETE] Package written to: {}", result.artifact.root.display());
    println!("  Reference: {}", result.artifact.reference);
    println!("  Package id: {}", result.artifact.package_id);
    println!("  Platform: {}", result.artifact.platform_identifier);
    println!("  Libraries: {}", result.metadata.libs.join(", "));
    println!("  Digest: {}", result.digest);

    Ok(())
}
