// src/recipe/kitchen/cook.rs

//! Cook: the build and packaging phases for a single configuration

use crate::error::{Error, Result};
use crate::recipe::format::Recipe;
use crate::recipe::metadata::{LICENSES_DIR, PackageArtifact, export_metadata};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info, warn};

use super::config::BuildPlan;
use super::tools::ToolResolution;
use super::Kitchen;

/// A configured and built tree, ready to be packaged
#[derive(Debug)]
pub struct BuiltTree {
    /// The plan the tree was built from
    pub plan: BuildPlan,
    /// Build output location
    pub build_dir: PathBuf,
    /// Tool requirement resolution result
    pub tools: ToolResolution,
    /// Build log
    pub log: String,
    /// Keeps a temporary build directory alive until packaging is done
    _temp: Option<TempDir>,
}

/// Phase: Simmer - configure and build the project
pub(super) fn simmer(
    kitchen: &Kitchen,
    plan: BuildPlan,
    tools: ToolResolution,
) -> Result<BuiltTree> {
    let (build_dir, temp) = match &kitchen.config.build_dir {
        Some(dir) => {
            fs::create_dir_all(dir).map_err(|e| {
                Error::IoError(format!("Failed to create build directory: {}", e))
            })?;
            (dir.clone(), None)
        }
        None => {
            let temp = tempfile::Builder::new()
                .prefix("librw-build-")
                .disable_cleanup(kitchen.config.keep_builddir)
                .tempdir()
                .map_err(|e| Error::IoError(format!("Failed to create build directory: {}", e)))?;
            (temp.path().to_path_buf(), Some(temp))
        }
    };
    debug!("Build directory: {}", build_dir.display());

    let mut log = String::new();
    let build_type = plan.configuration.settings.build_type;

    log.push_str(&kitchen.tool.configure(
        &kitchen.config.source_dir,
        &build_dir,
        &plan.definitions,
    )?);
    log.push_str(&kitchen.tool.build(&build_dir, build_type, kitchen.config.jobs)?);

    Ok(BuiltTree {
        plan,
        build_dir,
        tools,
        log,
        _temp: temp,
    })
}

/// Phase: Plate - install into the package layout
///
/// Everything is written to a staging directory next to the final package
/// and promoted only once complete, so a failed run never leaves a partial
/// package and never touches the package of another configuration.
pub(super) fn plate(kitchen: &Kitchen, recipe: &Recipe, built: &BuiltTree) -> Result<PackageArtifact> {
    let plan = &built.plan;
    let package_dir = kitchen.package_dir(recipe, &plan.package_id);
    let parent = package_dir
        .parent()
        .ok_or_else(|| Error::PackagingFailure("Package directory has no parent".to_string()))?;

    let license_src = kitchen.config.source_dir.join(&recipe.source.license_file);
    if !license_src.is_file() {
        return Err(Error::PackagingFailure(format!(
            "License file not found: {}",
            license_src.display()
        )));
    }

    fs::create_dir_all(parent).map_err(|e| {
        Error::PackagingFailure(format!("Failed to create {}: {}", parent.display(), e))
    })?;

    let staging = tempfile::Builder::new()
        .prefix(".staging-")
        .tempdir_in(parent)
        .map_err(|e| Error::PackagingFailure(format!("Failed to create staging directory: {}", e)))?;

    kitchen.tool.install(
        &built.build_dir,
        staging.path(),
        plan.configuration.settings.build_type,
    )?;

    let mut installed = fs::read_dir(staging.path()).map_err(|e| {
        Error::PackagingFailure(format!("Failed to read staging directory: {}", e))
    })?;
    if installed.next().is_none() {
        return Err(Error::PackagingFailure(
            "No files installed - install step may have failed".to_string(),
        ));
    }

    copy_license(&license_src, staging.path())?;

    let artifact = PackageArtifact {
        root: package_dir.clone(),
        reference: recipe.reference(&kitchen.config.user, &kitchen.config.channel),
        package_id: plan.package_id.clone(),
        platform: plan.configuration.platform(),
        platform_identifier: plan.platform_identifier.clone(),
        include_subdir: recipe.include_subdir().to_string(),
        requires: plan.requirements.libraries.clone(),
    };
    export_metadata(&artifact).write_to(staging.path())?;

    promote(staging.path(), &package_dir)?;
    info!("Packaged {} into {}", artifact.reference, package_dir.display());

    Ok(artifact)
}

/// Copy the license into the package's licenses directory
fn copy_license(license_src: &Path, staging: &Path) -> Result<()> {
    let licenses = staging.join(LICENSES_DIR);
    fs::create_dir_all(&licenses).map_err(|e| {
        Error::PackagingFailure(format!("Failed to create {}: {}", licenses.display(), e))
    })?;

    let file_name = license_src
        .file_name()
        .ok_or_else(|| Error::PackagingFailure("License path has no file name".to_string()))?;
    fs::copy(license_src, licenses.join(file_name)).map_err(|e| {
        Error::PackagingFailure(format!("Failed to copy {}: {}", license_src.display(), e))
    })?;

    Ok(())
}

/// Move a staged package into place, replacing an earlier package for the same id
fn promote(staged: &Path, package_dir: &Path) -> Result<()> {
    let moved = |e: std::io::Error| {
        Error::PackagingFailure(format!("Failed to move package into place: {}", e))
    };

    if !package_dir.exists() {
        return fs::rename(staged, package_dir).map_err(moved);
    }

    let mut backup = package_dir.as_os_str().to_owned();
    backup.push(".previous");
    let backup = PathBuf::from(backup);

    if backup.exists() {
        fs::remove_dir_all(&backup).map_err(|e| {
            Error::PackagingFailure(format!("Failed to remove {}: {}", backup.display(), e))
        })?;
    }
    fs::rename(package_dir, &backup).map_err(|e| {
        Error::PackagingFailure(format!("Failed to set aside previous package: {}", e))
    })?;

    if let Err(e) = fs::rename(staged, package_dir) {
        fs::rename(&backup, package_dir).map_err(|e| {
            Error::PackagingFailure(format!("Failed to restore previous package: {}", e))
        })?;
        return Err(moved(e));
    }

    if let Err(e) = fs::remove_dir_all(&backup) {
        warn!("Failed to remove previous package {}: {}", backup.display(), e);
    }
    Ok(())
}
