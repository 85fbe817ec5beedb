// src/recipe/kitchen/build_tool.rs

//! The native build tool the library's own build system is driven with

use crate::error::{Error, Result};
use crate::settings::BuildType;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

/// A configure + build + install capable build tool
///
/// Each step returns the captured output for the build log. Configure and
/// build failures are reported as [`Error::BuildFailure`], install failures
/// as [`Error::PackagingFailure`].
pub trait BuildTool: Send + Sync {
    /// Configure the project in `build_dir` with the given definitions
    fn configure(
        &self,
        source_dir: &Path,
        build_dir: &Path,
        definitions: &BTreeMap<String, String>,
    ) -> Result<String>;

    /// Build the configured project
    fn build(&self, build_dir: &Path, build_type: BuildType, jobs: u32) -> Result<String>;

    /// Install the built project below `prefix`
    fn install(&self, build_dir: &Path, prefix: &Path, build_type: BuildType) -> Result<String>;
}

/// CMake driven through its command-line interface
#[derive(Debug, Clone)]
pub struct CMake {
    program: PathBuf,
}

impl CMake {
    /// Use a specific cmake executable
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Find cmake on `PATH`
    pub fn locate() -> Result<Self> {
        let program = which::which("cmake")
            .map_err(|e| Error::InitError(format!("cmake not found on PATH: {}", e)))?;
        debug!("Using cmake at {}", program.display());
        Ok(Self::new(program))
    }

    /// Arguments of the configure step
    pub fn configure_args(
        source_dir: &Path,
        build_dir: &Path,
        definitions: &BTreeMap<String, String>,
    ) -> Vec<String> {
        let mut args = vec![
            "-S".to_string(),
            source_dir.to_string_lossy().to_string(),
            "-B".to_string(),
            build_dir.to_string_lossy().to_string(),
        ];
        args.extend(definitions.iter().map(|(k, v)| format!("-D{}={}", k, v)));
        args
    }

    /// Arguments of the build step
    pub fn build_args(build_dir: &Path, build_type: BuildType, jobs: u32) -> Vec<String> {
        vec![
            "--build".to_string(),
            build_dir.to_string_lossy().to_string(),
            "--config".to_string(),
            build_type.as_str().to_string(),
            "--parallel".to_string(),
            jobs.max(1).to_string(),
        ]
    }

    /// Arguments of the install step
    pub fn install_args(build_dir: &Path, prefix: &Path, build_type: BuildType) -> Vec<String> {
        vec![
            "--install".to_string(),
            build_dir.to_string_lossy().to_string(),
            "--config".to_string(),
            build_type.as_str().to_string(),
            "--prefix".to_string(),
            prefix.to_string_lossy().to_string(),
        ]
    }

    /// Run cmake with arguments, returning stdout and stderr
    fn run(&self, phase: &str, args: &[String]) -> std::result::Result<String, String> {
        info!("Running {} phase", phase);
        debug!("Command: {} {}", self.program.display(), args.join(" "));

        let output = Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|e| format!("Failed to run {}: {}", self.program.display(), e))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        if !output.status.success() {
            return Err(format!(
                "exit code {:?}\nstderr: {}",
                output.status.code(),
                stderr
            ));
        }

        let mut log = format!("=== {} ===\n", phase);
        if !stdout.is_empty() {
            log.push_str(&stdout);
            log.push('\n');
        }
        if !stderr.is_empty() {
            log.push_str(&stderr);
            log.push('\n');
        }
        Ok(log)
    }
}

impl BuildTool for CMake {
    fn configure(
        &self,
        source_dir: &Path,
        build_dir: &Path,
        definitions: &BTreeMap<String, String>,
    ) -> Result<String> {
        let args = Self::configure_args(source_dir, build_dir, definitions);
        self.run("configure", &args).map_err(|reason| Error::BuildFailure {
            phase: "configure".to_string(),
            reason,
        })
    }

    fn build(&self, build_dir: &Path, build_type: BuildType, jobs: u32) -> Result<String> {
        let args = Self::build_args(build_dir, build_type, jobs);
        self.run("build", &args).map_err(|reason| Error::BuildFailure {
            phase: "build".to_string(),
            reason,
        })
    }

    fn install(&self, build_dir: &Path, prefix: &Path, build_type: BuildType) -> Result<String> {
        let args = Self::install_args(build_dir, prefix, build_type);
        self.run("install", &args)
            .map_err(|reason| Error::PackagingFailure(format!("install step failed: {}", reason)))
    }
}
