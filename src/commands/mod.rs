// src/commands/mod.rs
//! Command handlers for the librw-recipe CLI

mod cook;
mod info;
mod matrix;
mod validate;

pub use cook::{CookOptions, cmd_cook};
pub use info::cmd_info;
pub use matrix::cmd_matrix;
pub use validate::cmd_validate;

use crate::cli::ConfigArgs;
use anyhow::{Context, Result};
use librw_recipe::recipe::{default_recipe, parse_recipe_file, validate_recipe};
use librw_recipe::{BuildConfiguration, Recipe, Settings};
use std::path::Path;

/// Load the recipe file, or the built-in recipe, and print its warnings
pub(crate) fn load_recipe(path: Option<&str>) -> Result<Recipe> {
    let recipe = match path {
        Some(path) => {
            println!("Reading recipe: {}", path);
            parse_recipe_file(Path::new(path))
                .with_context(|| format!("Failed to parse recipe: {}", path))?
        }
        None => default_recipe().context("Failed to parse built-in recipe")?,
    };

    let warnings = validate_recipe(&recipe).context("Recipe validation failed")?;
    for warning in &warnings {
        println!("Warning: {}", warning);
    }

    Ok(recipe)
}

/// Host settings and recipe option defaults with command-line overrides
pub(crate) fn configuration_from_args(
    recipe: &Recipe,
    args: &ConfigArgs,
) -> Result<BuildConfiguration> {
    let mut settings = Settings::host();
    for assignment in &args.settings {
        settings
            .apply(assignment)
            .with_context(|| format!("Invalid setting: {}", assignment))?;
    }

    let mut options = recipe.options;
    options
        .apply_all(&args.options)
        .context("Invalid option")?;

    Ok(BuildConfiguration::new(settings, options))
}
