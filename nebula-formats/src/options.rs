//! Decode options
//!
//! Plain immutable values handed to each decode call. Both structs read from
//! TOML/JSON with every field optional.

use serde::{Deserialize, Serialize};

use crate::nvx2::FormatVersion;

/// Requested NVX2 format version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatVersionHint {
    /// Pick the version whose vertex size matches the header
    #[default]
    Auto,
    /// Nebula 2 component registry
    Legacy,
    /// Nebula 3 component registry
    Current,
}

impl FormatVersionHint {
    /// The forced version, if any
    pub fn forced(self) -> Option<FormatVersion> {
        match self {
            FormatVersionHint::Auto => None,
            FormatVersionHint::Legacy => Some(FormatVersion::Legacy),
            FormatVersionHint::Current => Some(FormatVersion::Current),
        }
    }
}

impl std::str::FromStr for FormatVersionHint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" | "0" => Ok(FormatVersionHint::Auto),
            "legacy" | "2" | "nebula2" => Ok(FormatVersionHint::Legacy),
            "current" | "3" | "nebula3" => Ok(FormatVersionHint::Current),
            other => Err(format!(
                "unknown NVX2 version '{}' (use auto, legacy or current)",
                other
            )),
        }
    }
}

/// NVX2 decode options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Nvx2Options {
    pub version: FormatVersionHint,
    /// Populate the UV layer arrays
    pub create_uvs: bool,
    /// Populate bone weights and joint indices
    pub create_weights: bool,
    /// Populate vertex colors
    pub create_colors: bool,
}

impl Default for Nvx2Options {
    fn default() -> Self {
        Self {
            version: FormatVersionHint::Auto,
            create_uvs: true,
            create_weights: true,
            create_colors: false,
        }
    }
}

/// N3 decode options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct N3Options {
    /// Warn instead of failing on an unsupported file version
    pub ignore_version: bool,
}

impl Default for N3Options {
    fn default() -> Self {
        Self {
            ignore_version: true,
        }
    }
}
