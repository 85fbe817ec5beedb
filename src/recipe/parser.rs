// src/recipe/parser.rs

//! Recipe file parsing

use crate::error::{Error, Result};
use crate::recipe::format::{LIBRW_RECIPE, Recipe};
use std::path::Path;

/// Parse a recipe from a TOML string
pub fn parse_recipe(content: &str) -> Result<Recipe> {
    toml::from_str(content).map_err(|e| Error::ParseError(format!("Invalid recipe: {}", e)))
}

/// Parse a recipe from a file
pub fn parse_recipe_file(path: &Path) -> Result<Recipe> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::IoError(format!("Failed to read recipe file: {}", e)))?;

    parse_recipe(&content)
}

/// The recipe shipped with this crate
pub fn default_recipe() -> Result<Recipe> {
    parse_recipe(LIBRW_RECIPE)
}

/// Validate a recipe for completeness and correctness
pub fn validate_recipe(recipe: &Recipe) -> Result<Vec<String>> {
    let mut warnings = Vec::new();

    // Check for empty name/version
    if recipe.package.name.is_empty() {
        return Err(Error::ParseError("Recipe package name cannot be empty".to_string()));
    }
    if recipe.package.version.is_empty() {
        return Err(Error::ParseError("Recipe package version cannot be empty".to_string()));
    }

    // The license file is copied into the package, it must stay inside the source tree
    let license = Path::new(&recipe.source.license_file);
    if recipe.source.license_file.is_empty()
        || license.is_absolute()
        || license.components().any(|c| matches!(c, std::path::Component::ParentDir))
    {
        return Err(Error::ParseError(format!(
            "License file must be a relative path inside the source tree: '{}'",
            recipe.source.license_file
        )));
    }

    if recipe.package.license.is_none() {
        warnings.push("Missing package license".to_string());
    }
    if recipe.package.description.is_none() {
        warnings.push("Missing package description".to_string());
    }
    if recipe.package.url.is_none() {
        warnings.push("Missing upstream url".to_string());
    }

    Ok(warnings)
}
