// src/settings.rs

//! Build settings: operating system, compiler, architecture and build type
//!
//! Settings describe the machine a package is built for. They are
//! independent of the recipe's options and are shared by every recipe
//! a build configuration is applied to.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum_macros::EnumIter;

/// Target operating system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
pub enum Os {
    Windows,
    Linux,
    Macos,
    FreeBSD,
}

impl Os {
    /// Get the setting value as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Os::Windows => "Windows",
            Os::Linux => "Linux",
            Os::Macos => "Macos",
            Os::FreeBSD => "FreeBSD",
        }
    }

    /// Detect the operating system this process runs on
    pub fn host() -> Self {
        match std::env::consts::OS {
            "windows" => Os::Windows,
            "macos" => Os::Macos,
            "freebsd" => Os::FreeBSD,
            _ => Os::Linux,
        }
    }
}

impl FromStr for Os {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "windows" => Ok(Os::Windows),
            "linux" => Ok(Os::Linux),
            "macos" | "darwin" => Ok(Os::Macos),
            "freebsd" => Ok(Os::FreeBSD),
            _ => Err(Error::ConfigurationError(format!(
                "Unknown os '{}' (expected Windows, Linux, Macos or FreeBSD)",
                s
            ))),
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target CPU architecture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
#[serde(rename_all = "snake_case")]
pub enum Arch {
    X86,
    X86_64,
    Armv7,
    Armv8,
}

impl Arch {
    /// Get the setting value as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Arch::X86 => "x86",
            Arch::X86_64 => "x86_64",
            Arch::Armv7 => "armv7",
            Arch::Armv8 => "armv8",
        }
    }

    /// Detect the architecture this process runs on
    pub fn host() -> Self {
        match std::env::consts::ARCH {
            "x86" => Arch::X86,
            "arm" => Arch::Armv7,
            "aarch64" => Arch::Armv8,
            _ => Arch::X86_64,
        }
    }
}

impl FromStr for Arch {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "x86" | "i686" => Ok(Arch::X86),
            "x86_64" | "amd64" => Ok(Arch::X86_64),
            "armv7" | "arm" => Ok(Arch::Armv7),
            "armv8" | "aarch64" => Ok(Arch::Armv8),
            _ => Err(Error::ConfigurationError(format!(
                "Unknown arch '{}' (expected x86, x86_64, armv7 or armv8)",
                s
            ))),
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build type passed to the native build tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default, EnumIter)]
pub enum BuildType {
    #[default]
    Release,
    Debug,
    RelWithDebInfo,
    MinSizeRel,
}

impl BuildType {
    /// Get the setting value as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildType::Release => "Release",
            BuildType::Debug => "Debug",
            BuildType::RelWithDebInfo => "RelWithDebInfo",
            BuildType::MinSizeRel => "MinSizeRel",
        }
    }
}

impl FromStr for BuildType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "release" => Ok(BuildType::Release),
            "debug" => Ok(BuildType::Debug),
            "relwithdebinfo" => Ok(BuildType::RelWithDebInfo),
            "minsizerel" => Ok(BuildType::MinSizeRel),
            _ => Err(Error::ConfigurationError(format!("Unknown build_type '{}'", s))),
        }
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compiler family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompilerKind {
    Gcc,
    Clang,
    AppleClang,
    Msvc,
}

impl CompilerKind {
    /// Get the setting value as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            CompilerKind::Gcc => "gcc",
            CompilerKind::Clang => "clang",
            CompilerKind::AppleClang => "apple-clang",
            CompilerKind::Msvc => "Visual Studio",
        }
    }
}

impl FromStr for CompilerKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "gcc" => Ok(CompilerKind::Gcc),
            "clang" => Ok(CompilerKind::Clang),
            "apple-clang" => Ok(CompilerKind::AppleClang),
            "msvc" | "visual studio" => Ok(CompilerKind::Msvc),
            _ => Err(Error::ConfigurationError(format!("Unknown compiler '{}'", s))),
        }
    }
}

impl fmt::Display for CompilerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A compiler family together with its major version
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Compiler {
    pub kind: CompilerKind,
    pub version: String,
}

impl Compiler {
    /// Create a new compiler setting
    pub fn new(kind: CompilerKind, version: impl Into<String>) -> Self {
        Self {
            kind,
            version: version.into(),
        }
    }

    /// Default compiler for an operating system
    pub fn default_for(os: Os) -> Self {
        match os {
            Os::Windows => Compiler::new(CompilerKind::Msvc, "16"),
            Os::Macos => Compiler::new(CompilerKind::AppleClang, "10.0"),
            Os::FreeBSD => Compiler::new(CompilerKind::Clang, "8"),
            Os::Linux => Compiler::new(CompilerKind::Gcc, "9"),
        }
    }
}

impl fmt::Display for Compiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.version)
    }
}

/// The full set of settings a build configuration is built for
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Settings {
    pub os: Os,
    pub compiler: Compiler,
    pub arch: Arch,
    pub build_type: BuildType,
}

impl Settings {
    /// Settings describing the machine this process runs on
    pub fn host() -> Self {
        let os = Os::host();
        Self {
            os,
            compiler: Compiler::default_for(os),
            arch: Arch::host(),
            build_type: BuildType::default(),
        }
    }

    /// Apply a `key=value` setting assignment
    ///
    /// Recognized keys: `os`, `compiler`, `compiler.version`, `arch`,
    /// `build_type`. Changing `os` alone does not change the compiler.
    pub fn apply(&mut self, assignment: &str) -> Result<()> {
        let (key, value) = split_assignment(assignment)?;
        match key {
            "os" => self.os = value.parse()?,
            "compiler" => self.compiler.kind = value.parse()?,
            "compiler.version" => self.compiler.version = value.to_string(),
            "arch" => self.arch = value.parse()?,
            "build_type" => self.build_type = value.parse()?,
            _ => {
                return Err(Error::ConfigurationError(format!(
                    "Unknown setting '{}'",
                    key
                )));
            }
        }
        Ok(())
    }
}

/// Split a `key=value` assignment, trimming whitespace around both parts
pub(crate) fn split_assignment(assignment: &str) -> Result<(&str, &str)> {
    let (key, value) = assignment.split_once('=').ok_or_else(|| {
        Error::ConfigurationError(format!(
            "Expected key=value assignment, got '{}'",
            assignment
        ))
    })?;
    let (key, value) = (key.trim(), value.trim());
    if key.is_empty() || value.is_empty() {
        return Err(Error::ConfigurationError(format!(
            "Empty key or value in assignment '{}'",
            assignment
        )));
    }
    Ok((key, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_os_roundtrip_names() {
        for os in Os::iter() {
            assert_eq!(os.as_str().parse::<Os>().unwrap(), os);
        }
        assert_eq!("darwin".parse::<Os>().unwrap(), Os::Macos);
        assert!("plan9".parse::<Os>().is_err());
    }

    #[test]
    fn test_arch_aliases() {
        assert_eq!("amd64".parse::<Arch>().unwrap(), Arch::X86_64);
        assert_eq!("aarch64".parse::<Arch>().unwrap(), Arch::Armv8);
        assert!("sparc".parse::<Arch>().is_err());
    }

    #[test]
    fn test_settings_apply() {
        let mut settings = Settings::host();
        settings.apply("os=Windows").unwrap();
        settings.apply("compiler=msvc").unwrap();
        settings.apply("compiler.version=15").unwrap();
        settings.apply("arch = x86").unwrap();
        settings.apply("build_type=Debug").unwrap();

        assert_eq!(settings.os, Os::Windows);
        assert_eq!(settings.compiler, Compiler::new(CompilerKind::Msvc, "15"));
        assert_eq!(settings.arch, Arch::X86);
        assert_eq!(settings.build_type, BuildType::Debug);
    }

    #[test]
    fn test_settings_apply_errors() {
        let mut settings = Settings::host();
        assert!(settings.apply("os").is_err());
        assert!(settings.apply("os=").is_err());
        assert!(settings.apply("libc=musl").is_err());
        assert!(settings.apply("arch=sparc").unwrap_err().is_configuration());
    }

    #[test]
    fn test_default_compiler_per_os() {
        assert_eq!(Compiler::default_for(Os::Windows).kind, CompilerKind::Msvc);
        assert_eq!(Compiler::default_for(Os::Linux).kind, CompilerKind::Gcc);
        assert_eq!(Compiler::default_for(Os::Macos).kind, CompilerKind::AppleClang);
    }
}
