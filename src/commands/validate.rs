// src/commands/validate.rs

//! Validate command - check a configuration without building

use super::{configuration_from_args, load_recipe};
use crate::cli::ConfigArgs;
use anyhow::{Context, Result};
use librw_recipe::recipe::validate;
use librw_recipe::RequirementSet;

/// Validate a configuration and print what building it would require
pub fn cmd_validate(args: &ConfigArgs) -> Result<()> {
    let recipe = load_recipe(args.recipe.as_deref())?;
    let config = configuration_from_args(&recipe, args)?;

    println!("Recipe: {} version {}", recipe.package.name, recipe.package.version);
    println!("Configuration: {}", config);

    validate(&config).context("Configuration is not buildable")?;

    let platform = config.platform();
    let requirements = RequirementSet::for_platform(platform);

    println!("Platform identifier: {}", platform.identifier());
    println!("Package id: {}", config.package_id());

    if requirements.is_empty() {
        println!("Requirements: none");
    } else {
        for tool in &requirements.tools {
            println!("  build requires: {}", tool);
        }
        for library in &requirements.libraries {
            println!("  requires: {}", library);
        }
    }

    println!("[OK] Configuration valid");
    Ok(())
}
