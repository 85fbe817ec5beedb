// src/recipe/requirements.rs

//! Configuration validation and platform requirement resolution
//!
//! Validation runs while options are finalized, before any requirement is
//! resolved or any tool is started. Resolution is a pure function of the
//! platform: the same platform always yields the same requirement set.

use crate::error::{Error, Result};
use crate::recipe::configuration::BuildConfiguration;
use crate::recipe::platform::Platform;
use crate::reference::PackageReference;
use tracing::debug;

/// Check the platform/OS compatibility of a configuration
pub fn validate(config: &BuildConfiguration) -> Result<()> {
    let platform = config.platform();
    let os = config.settings.os;

    if !platform.supports(os) {
        let required = platform
            .required_os()
            .map(|r| r.as_str())
            .unwrap_or("another os");
        return Err(Error::ConfigurationError(format!(
            "Current os ({}) does not support platform '{}' (requires {})",
            os, platform, required
        )));
    }

    debug!("Configuration valid: {}", config);
    Ok(())
}

/// Build-time tool requirements for a platform
pub fn resolve_tool_requirements(platform: Platform) -> Vec<PackageReference> {
    platform.tool_requirements()
}

/// Link-time library requirements for a platform
pub fn resolve_library_requirements(platform: Platform) -> Vec<PackageReference> {
    platform.library_requirements()
}

/// Tool and library requirements of one build configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequirementSet {
    /// Needed only to perform the build
    pub tools: Vec<PackageReference>,
    /// Needed to link the built artifact
    pub libraries: Vec<PackageReference>,
}

impl RequirementSet {
    /// Resolve the requirement set for a platform
    pub fn for_platform(platform: Platform) -> Self {
        Self {
            tools: resolve_tool_requirements(platform),
            libraries: resolve_library_requirements(platform),
        }
    }

    /// Whether the platform needs nothing beyond the library's own sources
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty() && self.libraries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Os;
    use strum::IntoEnumIterator;

    fn config_for(platform: Platform, os: Os) -> BuildConfiguration {
        let mut config = BuildConfiguration::host(platform);
        config.settings.os = os;
        config
    }

    #[test]
    fn test_validate_non_d3d_any_os() {
        for platform in Platform::iter().filter(|p| *p != Platform::D3d) {
            for os in Os::iter() {
                assert!(validate(&config_for(platform, os)).is_ok(), "{} {}", platform, os);
            }
        }
    }

    #[test]
    fn test_validate_d3d_only_on_windows() {
        for os in Os::iter() {
            let result = validate(&config_for(Platform::D3d, os));
            if os == Os::Windows {
                assert!(result.is_ok());
            } else {
                let err = result.unwrap_err();
                assert!(err.is_configuration());
                assert!(err.to_string().contains("d3d"));
            }
        }
    }

    #[test]
    fn test_tool_requirements() {
        let tools = resolve_tool_requirements(Platform::Ps2);
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].to_string(), "ps2_toolchain_installer@rwengine/stable");

        for platform in [Platform::Null, Platform::Gl3, Platform::D3d] {
            assert!(resolve_tool_requirements(platform).is_empty());
        }
    }

    #[test]
    fn test_library_requirements() {
        let libs: Vec<String> = resolve_library_requirements(Platform::Gl3)
            .iter()
            .map(|r| r.to_string())
            .collect();
        assert_eq!(
            libs,
            vec!["sdl2/2.0.9@bincrafters/stable", "glew/2.1.0@bincrafters/stable"]
        );

        for platform in [Platform::Null, Platform::D3d, Platform::Ps2] {
            assert!(resolve_library_requirements(platform).is_empty());
        }
    }

    #[test]
    fn test_requirement_set_is_pure() {
        for platform in Platform::iter() {
            assert_eq!(
                RequirementSet::for_platform(platform),
                RequirementSet::for_platform(platform)
            );
        }
        assert!(RequirementSet::for_platform(Platform::Null).is_empty());
        assert!(!RequirementSet::for_platform(Platform::Ps2).is_empty());
    }
}
