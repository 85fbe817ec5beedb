// src/recipe/metadata.rs

//! Installed packages and the metadata they export to consumers

use crate::error::{Error, Result};
use crate::recipe::platform::Platform;
use crate::reference::PackageReference;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Top-level include directory inside a package
pub const INCLUDE_ROOT: &str = "include";

/// Libraries every package of the recipe provides
pub const LIBRARIES: [&str; 2] = ["rw", "rw_skeleton"];

/// Directory the license file is copied into
pub const LICENSES_DIR: &str = "licenses";

/// File the exported metadata is written to inside a package
pub const METADATA_FILE: &str = "package_info.json";

/// Key of the platform identifier in the exported user info
pub const PLATFORM_INFO_KEY: &str = "LIBRW_PLATFORM";

/// The installed output of a successful build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageArtifact {
    /// Package directory
    pub root: PathBuf,
    /// Published reference of the package
    pub reference: PackageReference,
    /// Configuration hash the package was built for
    pub package_id: String,
    /// Platform the package was built for
    pub platform: Platform,
    /// Identifier that was handed to the build
    pub platform_identifier: String,
    /// Include subdirectory named after the library
    pub include_subdir: String,
    /// Link-time requirements of the package
    pub requires: Vec<PackageReference>,
}

impl PackageArtifact {
    /// Path of the license directory
    pub fn licenses_dir(&self) -> PathBuf {
        self.root.join(LICENSES_DIR)
    }

    /// SHA-256 over every file in the package, in path order
    ///
    /// Two packages with the same relative paths and contents have the
    /// same digest regardless of where they live.
    pub fn digest(&self) -> Result<String> {
        digest_tree(&self.root)
    }
}

/// Hash the relative paths and contents of all files below `root`
pub fn digest_tree(root: &Path) -> Result<String> {
    let mut hasher = Sha256::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| Error::IoError(format!("Failed to walk package: {}", e)))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(root)
            .map_err(|e| Error::IoError(format!("Path outside package: {}", e)))?;
        let content = fs::read(entry.path())?;

        hasher.update(relative.to_string_lossy().as_bytes());
        hasher.update([0u8]);
        hasher.update((content.len() as u64).to_le_bytes());
        hasher.update(&content);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Consumer-visible information attached to a package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageMetadata {
    /// Package directory the relative paths resolve against
    #[serde(skip)]
    pub package_root: PathBuf,
    /// Include directories, relative to the package root
    pub include_dirs: Vec<PathBuf>,
    /// Library names to link
    pub libs: Vec<String>,
    /// Free-form values consumers can read, including the platform identifier
    pub user_info: BTreeMap<String, String>,
    /// Packages consumers must link as well
    #[serde(default)]
    pub requires: Vec<PackageReference>,
}

impl PackageMetadata {
    /// Absolute include directories
    pub fn include_paths(&self) -> Vec<PathBuf> {
        self.include_dirs
            .iter()
            .map(|dir| self.package_root.join(dir))
            .collect()
    }

    /// Platform identifier the package was built with
    pub fn platform_identifier(&self) -> Option<&str> {
        self.user_info.get(PLATFORM_INFO_KEY).map(String::as_str)
    }

    /// Write the metadata file into a package directory
    pub fn write_to(&self, dir: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| Error::PackagingFailure(format!("Failed to encode metadata: {}", e)))?;
        fs::write(dir.join(METADATA_FILE), json + "\n").map_err(|e| {
            Error::PackagingFailure(format!("Failed to write {}: {}", METADATA_FILE, e))
        })
    }

    /// Read the metadata file of an installed package
    pub fn read_from(package_root: &Path) -> Result<Self> {
        let path = package_root.join(METADATA_FILE);
        let content = fs::read_to_string(&path)
            .map_err(|e| Error::IoError(format!("Failed to read {}: {}", path.display(), e)))?;
        let mut metadata: PackageMetadata = serde_json::from_str(&content)
            .map_err(|e| Error::ParseError(format!("Invalid {}: {}", METADATA_FILE, e)))?;
        metadata.package_root = package_root.to_path_buf();
        Ok(metadata)
    }
}

/// Build the metadata a package exports
///
/// Include directories and library names are the same for every platform;
/// only the platform identifier and the link requirements vary. The
/// identifier is the one recorded on the artifact at build time.
pub fn export_metadata(artifact: &PackageArtifact) -> PackageMetadata {
    let mut user_info = BTreeMap::new();
    user_info.insert(
        PLATFORM_INFO_KEY.to_string(),
        artifact.platform_identifier.clone(),
    );

    PackageMetadata {
        package_root: artifact.root.clone(),
        include_dirs: vec![
            PathBuf::from(INCLUDE_ROOT),
            Path::new(INCLUDE_ROOT).join(&artifact.include_subdir),
        ],
        libs: LIBRARIES.iter().map(|l| l.to_string()).collect(),
        user_info,
        requires: artifact.requires.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn artifact(root: &Path, platform: Platform) -> PackageArtifact {
        PackageArtifact {
            root: root.to_path_buf(),
            reference: PackageReference::pinned("librw", "master", "rwengine", "testing"),
            package_id: "0".repeat(64),
            platform,
            platform_identifier: platform.identifier(),
            include_subdir: "librw".to_string(),
            requires: platform.library_requirements(),
        }
    }

    #[test]
    fn test_export_metadata_layout() {
        let metadata = export_metadata(&artifact(Path::new("/pkg"), Platform::Gl3));

        assert_eq!(
            metadata.include_paths(),
            vec![PathBuf::from("/pkg/include"), PathBuf::from("/pkg/include/librw")]
        );
        assert_eq!(metadata.libs, vec!["rw", "rw_skeleton"]);
        assert_eq!(metadata.platform_identifier(), Some("GL3"));
        assert_eq!(metadata.requires.len(), 2);
    }

    #[test]
    fn test_export_metadata_platform_invariant_fields() {
        let root = Path::new("/pkg");
        let baseline = export_metadata(&artifact(root, Platform::Null));

        for platform in Platform::iter() {
            let metadata = export_metadata(&artifact(root, platform));
            assert_eq!(metadata.include_dirs, baseline.include_dirs);
            assert_eq!(metadata.libs, baseline.libs);
            assert_eq!(
                metadata.platform_identifier(),
                Some(platform.identifier().as_str())
            );
        }
    }

    #[test]
    fn test_metadata_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let metadata = export_metadata(&artifact(dir.path(), Platform::Ps2));
        metadata.write_to(dir.path()).unwrap();

        let read = PackageMetadata::read_from(dir.path()).unwrap();
        assert_eq!(read, metadata);
        assert_eq!(read.platform_identifier(), Some("PS2"));
    }

    #[test]
    fn test_digest_tree_ignores_location() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        for dir in [a.path(), b.path()] {
            fs::create_dir_all(dir.join("include/librw")).unwrap();
            fs::write(dir.join("include/rw.h"), "#pragma once\n").unwrap();
            fs::write(dir.join("include/librw/rwbase.h"), "struct RwBase;\n").unwrap();
        }
        assert_eq!(digest_tree(a.path()).unwrap(), digest_tree(b.path()).unwrap());

        fs::write(b.path().join("include/rw.h"), "changed\n").unwrap();
        assert_ne!(digest_tree(a.path()).unwrap(), digest_tree(b.path()).unwrap());
    }
}
