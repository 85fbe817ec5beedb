// src/recipe/options.rs

//! The recipe's option surface: linkage, position-independent code, platform

use crate::error::{Error, Result};
use crate::recipe::platform::Platform;
use crate::settings::split_assignment;
use serde::{Deserialize, Serialize};

/// Options a consumer or the build matrix can set on the recipe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct RecipeOptions {
    /// Build shared instead of static libraries
    pub shared: bool,

    /// Build position-independent code
    #[serde(rename = "fPIC")]
    pub fpic: bool,

    /// Rendering backend
    pub platform: Platform,
}

impl Default for RecipeOptions {
    fn default() -> Self {
        Self {
            shared: false,
            fpic: true,
            platform: Platform::Null,
        }
    }
}

impl RecipeOptions {
    /// Apply a `name=value` option assignment
    ///
    /// Accepts `shared`, `fPIC` and `platform`. Boolean values may be
    /// spelled `True`/`False`, `true`/`false`, `on`/`off` or `1`/`0`.
    pub fn apply(&mut self, assignment: &str) -> Result<()> {
        let (name, value) = split_assignment(assignment)?;
        match name {
            "shared" => self.shared = parse_bool(name, value)?,
            "fPIC" | "fpic" => self.fpic = parse_bool(name, value)?,
            "platform" => self.platform = value.parse()?,
            _ => {
                return Err(Error::ConfigurationError(format!(
                    "Unknown option '{}' (expected shared, fPIC or platform)",
                    name
                )));
            }
        }
        Ok(())
    }

    /// Apply several assignments in order
    pub fn apply_all<I, S>(&mut self, assignments: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for assignment in assignments {
            self.apply(assignment.as_ref())?;
        }
        Ok(())
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "on" | "1" => Ok(true),
        "false" | "off" | "0" => Ok(false),
        _ => Err(Error::ConfigurationError(format!(
            "Option '{}' expects True or False, got '{}'",
            name, value
        ))),
    }
}
