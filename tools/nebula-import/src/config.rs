//! Import configuration (nebula-import.toml)
//!
//! ```toml
//! [nvx2]
//! version = "auto"
//! create_colors = true
//!
//! [n3]
//! ignore_version = false
//!
//! [scene]
//! resource_root = "export"
//! ```
//!
//! Every table and field is optional; missing ones take their defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use nebula_formats::{N3Options, Nvx2Options};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ImportConfig {
    #[serde(default)]
    pub nvx2: Nvx2Options,
    #[serde(default)]
    pub n3: N3Options,
    #[serde(default)]
    pub scene: SceneConfig,
}

/// What the scene build plan should contain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Parent all objects of an NVX2 file under one empty named after the file
    #[serde(default = "default_true")]
    pub create_parent_empty: bool,
    #[serde(default = "default_true")]
    pub create_armatures: bool,
    #[serde(default = "default_true")]
    pub create_materials: bool,
    /// Share one material between nodes naming the same material
    #[serde(default)]
    pub reuse_materials: bool,
    /// Follow N3 mesh references into their NVX2 files
    #[serde(default = "default_true")]
    pub import_meshes: bool,
    /// Directory that resource ids like `msh:foo.nvx2` resolve against
    #[serde(default)]
    pub resource_root: Option<PathBuf>,
}

fn default_true() -> bool {
    true
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            create_parent_empty: true,
            create_armatures: true,
            create_materials: true,
            reuse_materials: false,
            import_meshes: true,
            resource_root: None,
        }
    }
}

impl ImportConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid import configuration")
    }

    /// Load a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {:?}", path))?;
        Self::from_toml_str(&content).with_context(|| format!("In config file {:?}", path))
    }

    /// Load `path` if given, otherwise use the defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize import configuration")
    }
}
