// src/recipe/platform.rs

//! Rendering backend selection and its per-platform rules
//!
//! Every platform-dependent decision the recipe makes lives in one table:
//! which operating system the backend needs, which build tools and link
//! libraries it pulls in, and the identifier handed to the library's own
//! build system. Adding a platform means adding one row here.

use crate::error::{Error, Result};
use crate::reference::PackageReference;
use crate::settings::Os;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

/// Rendering backend the library is built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter)]
pub enum Platform {
    /// Software rasterizer, no graphics API
    #[default]
    Null,
    /// OpenGL 3 renderer
    Gl3,
    /// Direct3D renderer
    D3d,
    /// PS2 hardware backend
    Ps2,
}

/// Static description of a package reference in the platform table
struct StaticReference {
    name: &'static str,
    version: Option<&'static str>,
    user: &'static str,
    channel: &'static str,
}

impl StaticReference {
    fn to_reference(&self) -> PackageReference {
        PackageReference {
            name: self.name.to_string(),
            version: self.version.map(str::to_string),
            user: self.user.to_string(),
            channel: self.channel.to_string(),
        }
    }
}

/// One row of the platform table
struct PlatformRules {
    /// Canonical option value
    name: &'static str,
    /// Alternative spellings accepted when parsing
    aliases: &'static [&'static str],
    /// Operating system the backend is restricted to
    required_os: Option<Os>,
    /// Needed only to perform the build
    tool_requirements: &'static [StaticReference],
    /// Needed to link the built libraries
    library_requirements: &'static [StaticReference],
}

const PS2_TOOLCHAIN: StaticReference = StaticReference {
    name: "ps2_toolchain_installer",
    version: None,
    user: "rwengine",
    channel: "stable",
};

const SDL2: StaticReference = StaticReference {
    name: "sdl2",
    version: Some("2.0.9"),
    user: "bincrafters",
    channel: "stable",
};

const GLEW: StaticReference = StaticReference {
    name: "glew",
    version: Some("2.1.0"),
    user: "bincrafters",
    channel: "stable",
};

impl Platform {
    fn rules(&self) -> &'static PlatformRules {
        const NULL: PlatformRules = PlatformRules {
            name: "null",
            aliases: &["software-rasterizer", "software"],
            required_os: None,
            tool_requirements: &[],
            library_requirements: &[],
        };
        const GL3: PlatformRules = PlatformRules {
            name: "gl3",
            aliases: &["opengl3", "opengl"],
            required_os: None,
            tool_requirements: &[],
            library_requirements: &[SDL2, GLEW],
        };
        const D3D: PlatformRules = PlatformRules {
            name: "d3d",
            aliases: &["direct3d"],
            required_os: Some(Os::Windows),
            tool_requirements: &[],
            library_requirements: &[],
        };
        const PS2: PlatformRules = PlatformRules {
            name: "ps2",
            aliases: &["ps2-hardware"],
            required_os: None,
            tool_requirements: &[PS2_TOOLCHAIN],
            library_requirements: &[],
        };

        match self {
            Platform::Null => &NULL,
            Platform::Gl3 => &GL3,
            Platform::D3d => &D3D,
            Platform::Ps2 => &PS2,
        }
    }

    /// Canonical option value (`null`, `gl3`, `d3d`, `ps2`)
    pub fn as_str(&self) -> &'static str {
        self.rules().name
    }

    /// Identifier passed to the library's build and exported to consumers
    pub fn identifier(&self) -> String {
        self.as_str().to_uppercase()
    }

    /// Operating system this platform is restricted to, if any
    pub fn required_os(&self) -> Option<Os> {
        self.rules().required_os
    }

    /// Whether this platform can be built for the given operating system
    pub fn supports(&self, os: Os) -> bool {
        self.required_os().is_none_or(|required| required == os)
    }

    /// Build-time tool requirements
    pub fn tool_requirements(&self) -> Vec<PackageReference> {
        self.rules()
            .tool_requirements
            .iter()
            .map(StaticReference::to_reference)
            .collect()
    }

    /// Link-time library requirements
    pub fn library_requirements(&self) -> Vec<PackageReference> {
        self.rules()
            .library_requirements
            .iter()
            .map(StaticReference::to_reference)
            .collect()
    }
}

impl FromStr for Platform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Platform::iter()
            .find(|p| {
                let rules = p.rules();
                rules.name == wanted || rules.aliases.iter().any(|alias| *alias == wanted)
            })
            .ok_or_else(|| {
                Error::ConfigurationError(format!(
                    "Unknown platform '{}' (expected null, gl3, d3d or ps2)",
                    s
                ))
            })
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Platform {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Platform {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
