// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use librw_recipe::recipe::{BuildTool, DirectoryResolver, ToolResolver};
use librw_recipe::{
    BuildConfiguration, BuildType, Error, Kitchen, KitchenConfig, Os, Platform, Result,
};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Headers and libraries the fake install step produces
pub const INSTALLED_FILES: &[(&str, &str)] = &[
    ("include/rw.h", "#include \"librw/rwbase.h\"\n"),
    ("include/librw/rwbase.h", "typedef int int32;\n"),
    ("lib/librw.a", "!<arch>\nrw\n"),
    ("lib/librw_skeleton.a", "!<arch>\nrw_skeleton\n"),
];

/// Build tool standing in for cmake
///
/// Records every call with the definitions it was configured with and
/// installs a fixed set of files. Can be told to fail one phase.
#[derive(Default)]
pub struct FakeBuildTool {
    pub calls: Mutex<Vec<String>>,
    pub definitions: Mutex<Option<BTreeMap<String, String>>>,
    fail_phase: Option<&'static str>,
}

impl FakeBuildTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// A tool whose `phase` step fails
    pub fn failing(phase: &'static str) -> Self {
        Self {
            fail_phase: Some(phase),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn definitions(&self) -> BTreeMap<String, String> {
        self.definitions.lock().unwrap().clone().unwrap_or_default()
    }

    fn enter(&self, phase: &str) -> Result<()> {
        self.calls.lock().unwrap().push(phase.to_string());
        if self.fail_phase == Some(phase) {
            let reason = "exit code Some(2)".to_string();
            return Err(match phase {
                "install" => Error::PackagingFailure(format!("install step failed: {}", reason)),
                _ => Error::BuildFailure {
                    phase: phase.to_string(),
                    reason,
                },
            });
        }
        Ok(())
    }
}

impl BuildTool for FakeBuildTool {
    fn configure(
        &self,
        _source_dir: &Path,
        build_dir: &Path,
        definitions: &BTreeMap<String, String>,
    ) -> Result<String> {
        self.enter("configure")?;
        *self.definitions.lock().unwrap() = Some(definitions.clone());
        fs::write(build_dir.join("CMakeCache.txt"), "configured\n")?;
        Ok("=== configure ===\n".to_string())
    }

    fn build(&self, _build_dir: &Path, _build_type: BuildType, _jobs: u32) -> Result<String> {
        self.enter("build")?;
        Ok("=== build ===\n".to_string())
    }

    fn install(&self, _build_dir: &Path, prefix: &Path, _build_type: BuildType) -> Result<String> {
        self.enter("install")?;
        for (path, content) in INSTALLED_FILES {
            let target = prefix.join(path);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(target, content)?;
        }
        Ok("=== install ===\n".to_string())
    }
}

/// Scratch directories for one test
pub struct Workspace {
    pub source: TempDir,
    pub output: TempDir,
    pub tools: TempDir,
}

impl Workspace {
    /// A source tree with a license file and empty output and tools directories
    pub fn new() -> Self {
        let source = tempfile::tempdir().unwrap();
        fs::write(source.path().join("LICENSE"), "MIT License\n\nCopyright (c) aap\n").unwrap();
        fs::write(source.path().join("CMakeLists.txt"), "project(librw)\n").unwrap();
        Self {
            source,
            output: tempfile::tempdir().unwrap(),
            tools: tempfile::tempdir().unwrap(),
        }
    }

    pub fn kitchen_config(&self) -> KitchenConfig {
        KitchenConfig {
            source_dir: self.source.path().to_path_buf(),
            output_dir: self.output.path().to_path_buf(),
            tools_root: self.tools.path().to_path_buf(),
            jobs: 2,
            ..Default::default()
        }
    }

    /// Kitchen using `tool` and the workspace's tools directory
    pub fn kitchen(&self, tool: Arc<FakeBuildTool>) -> Kitchen {
        let resolver: Arc<dyn ToolResolver> = Arc::new(DirectoryResolver::new(self.tools.path()));
        Kitchen::with_resolver(self.kitchen_config(), tool, resolver)
    }

    /// Make a build tool requirement available
    pub fn provide_tool(&self, name: &str) {
        fs::create_dir_all(self.tools.path().join(name)).unwrap();
    }

    /// Every file below the output directory, relative to it
    pub fn output_files(&self) -> Vec<PathBuf> {
        walk(self.output.path())
            .into_iter()
            .map(|p| p.strip_prefix(self.output.path()).unwrap().to_path_buf())
            .collect()
    }
}

fn walk(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            files.extend(walk(&path));
        } else {
            files.push(path);
        }
    }
    files.sort();
    files
}

/// Host settings with the given platform and operating system
pub fn config_for(platform: Platform, os: Os) -> BuildConfiguration {
    let mut config = BuildConfiguration::host(platform);
    config.settings.os = os;
    config
}
