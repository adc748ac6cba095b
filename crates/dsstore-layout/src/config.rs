use std::path::Path;

use dsstore_format::ParserConfig;
use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, LayoutResult};
use crate::positions::GLB_EXTENSION;

/// Where the layout file lives and which files it positions.
///
/// ```toml
/// asset_path = "assets/goldens/DS_Store"
/// extension = ".glb"
///
/// [parser]
/// root_key = "DSDB"
/// enforce_tree_height = true
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Path of the `.DS_Store` file within the asset source.
    pub asset_path: String,
    /// Only filenames with this suffix (case-insensitive) are mapped.
    pub extension: String,
    pub parser: ParserConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            asset_path: "assets/goldens/DS_Store".to_string(),
            extension: GLB_EXTENSION.to_string(),
            parser: ParserConfig::default(),
        }
    }
}

impl LayoutConfig {
    /// Parse from TOML text.
    pub fn from_toml_str(s: &str) -> LayoutResult<Self> {
        toml::from_str(s).map_err(|e| LayoutError::Config(e.to_string()))
    }

    /// Load from a TOML file.
    pub fn load(path: &Path) -> LayoutResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
