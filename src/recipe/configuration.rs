// src/recipe/configuration.rs

//! Build configurations: one concrete settings + options combination

use crate::recipe::options::RecipeOptions;
use crate::recipe::platform::Platform;
use crate::settings::Settings;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// One cell of a build matrix, or the configuration of a direct build
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildConfiguration {
    pub settings: Settings,
    pub options: RecipeOptions,
}

impl BuildConfiguration {
    /// Create a configuration from settings and options
    pub fn new(settings: Settings, options: RecipeOptions) -> Self {
        Self { settings, options }
    }

    /// Host settings with default options for the given platform
    pub fn host(platform: Platform) -> Self {
        Self {
            settings: Settings::host(),
            options: RecipeOptions {
                platform,
                ..RecipeOptions::default()
            },
        }
    }

    /// Rendering backend of this configuration
    pub fn platform(&self) -> Platform {
        self.options.platform
    }

    /// Canonical `key=value` lines identifying this configuration
    ///
    /// Lines are in a fixed order so the package id is stable.
    pub fn canonical_lines(&self) -> Vec<String> {
        vec![
            format!("os={}", self.settings.os),
            format!("arch={}", self.settings.arch),
            format!("compiler={}", self.settings.compiler.kind),
            format!("compiler.version={}", self.settings.compiler.version),
            format!("build_type={}", self.settings.build_type),
            format!("shared={}", self.options.shared),
            format!("fPIC={}", self.options.fpic),
            format!("platform={}", self.options.platform),
        ]
    }

    /// Package id: SHA-256 over the canonical configuration lines
    pub fn package_id(&self) -> String {
        let mut hasher = Sha256::new();
        for line in self.canonical_lines() {
            hasher.update(line.as_bytes());
            hasher.update(b"\n");
        }
        hex::encode(hasher.finalize())
    }
}

impl fmt::Display for BuildConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} shared={} fPIC={} platform={}",
            self.settings.os,
            self.settings.arch,
            self.settings.compiler,
            self.settings.build_type,
            self.options.shared,
            self.options.fpic,
            self.options.platform
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{Arch, BuildType, Compiler, CompilerKind, Os};

    fn linux_config(platform: Platform) -> BuildConfiguration {
        BuildConfiguration::new(
            Settings {
                os: Os::Linux,
                compiler: Compiler::new(CompilerKind::Gcc, "9"),
                arch: Arch::X86_64,
                build_type: BuildType::Release,
            },
            RecipeOptions {
                platform,
                ..RecipeOptions::default()
            },
        )
    }

    #[test]
    fn test_package_id_is_deterministic() {
        let a = linux_config(Platform::Gl3);
        let b = linux_config(Platform::Gl3);
        assert_eq!(a.package_id(), b.package_id());
        assert_eq!(a.package_id().len(), 64);
    }

    #[test]
    fn test_package_id_differs_per_configuration() {
        let gl3 = linux_config(Platform::Gl3);
        let null = linux_config(Platform::Null);
        assert_ne!(gl3.package_id(), null.package_id());

        let mut debug = linux_config(Platform::Gl3);
        debug.settings.build_type = BuildType::Debug;
        assert_ne!(gl3.package_id(), debug.package_id());
    }

    #[test]
    fn test_host_configuration_uses_platform() {
        let config = BuildConfiguration::host(Platform::Ps2);
        assert_eq!(config.platform(), Platform::Ps2);
        assert!(!config.options.shared);
        assert!(config.options.fpic);
    }

    #[test]
    fn test_display() {
        let config = linux_config(Platform::Null);
        assert_eq!(
            config.to_string(),
            "Linux x86_64 gcc 9 Release shared=false fPIC=true platform=null"
        );
    }
}
