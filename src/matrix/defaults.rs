// src/matrix/defaults.rs

//! The default compatibility matrix
//!
//! Compilers per operating system with the architectures they are built
//! for. Every target is expanded over both build types and both linkages.

use crate::recipe::{BuildConfiguration, RecipeOptions};
use crate::settings::{Arch, BuildType, Compiler, CompilerKind, Os, Settings};

/// One compiler family on one operating system
#[derive(Debug, Clone, Copy)]
pub struct CompilerTarget {
    pub os: Os,
    pub kind: CompilerKind,
    pub versions: &'static [&'static str],
    pub archs: &'static [Arch],
}

const BOTH_ARCHS: &[Arch] = &[Arch::X86_64, Arch::X86];

/// Compilers the default matrix is built with
pub const COMMON_TARGETS: &[CompilerTarget] = &[
    CompilerTarget {
        os: Os::Linux,
        kind: CompilerKind::Gcc,
        versions: &["7", "8", "9"],
        archs: BOTH_ARCHS,
    },
    CompilerTarget {
        os: Os::Linux,
        kind: CompilerKind::Clang,
        versions: &["8"],
        archs: BOTH_ARCHS,
    },
    CompilerTarget {
        os: Os::Windows,
        kind: CompilerKind::Msvc,
        versions: &["15", "16"],
        archs: BOTH_ARCHS,
    },
    // 32-bit builds are gone from current macOS SDKs
    CompilerTarget {
        os: Os::Macos,
        kind: CompilerKind::AppleClang,
        versions: &["10.0"],
        archs: &[Arch::X86_64],
    },
];

const BUILD_TYPES: [BuildType; 2] = [BuildType::Release, BuildType::Debug];

/// Expand the default matrix with the given base options
///
/// The platform of every cell is `base.platform`; cells are not validated.
pub fn common_builds(base: RecipeOptions) -> Vec<BuildConfiguration> {
    let mut builds = Vec::new();

    for target in COMMON_TARGETS {
        for version in target.versions {
            for arch in target.archs {
                for build_type in BUILD_TYPES {
                    for shared in [false, true] {
                        let settings = Settings {
                            os: target.os,
                            compiler: Compiler::new(target.kind, *version),
                            arch: *arch,
                            build_type,
                        };
                        let options = RecipeOptions { shared, ..base };
                        builds.push(BuildConfiguration::new(settings, options));
                    }
                }
            }
        }
    }

    builds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::Platform;
    use std::collections::HashSet;

    #[test]
    fn test_common_builds_size() {
        // (3 gcc + 1 clang + 2 msvc) * 2 archs + 1 apple-clang * 1 arch,
        // times 2 build types and 2 linkages
        let builds = common_builds(RecipeOptions::default());
        assert_eq!(builds.len(), (6 * 2 + 1) * 2 * 2);
    }

    #[test]
    fn test_common_builds_are_distinct() {
        let builds = common_builds(RecipeOptions::default());
        let ids: HashSet<String> = builds.iter().map(|b| b.package_id()).collect();
        assert_eq!(ids.len(), builds.len());
    }

    #[test]
    fn test_common_builds_keep_base_options() {
        let base = RecipeOptions {
            fpic: false,
            platform: Platform::Gl3,
            ..Default::default()
        };
        for build in common_builds(base) {
            assert_eq!(build.platform(), Platform::Gl3);
            assert!(!build.options.fpic);
        }
    }
}
