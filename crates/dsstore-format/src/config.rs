use serde::{Deserialize, Serialize};

use crate::allocator::ROOT_DIRECTORY_KEY;

/// Parser configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Table-of-contents key of the tree to walk. Other keys are ignored.
    pub root_key: String,
    /// Fail on nodes deeper than the master block's declared tree height.
    pub enforce_tree_height: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            root_key: ROOT_DIRECTORY_KEY.to_string(),
            enforce_tree_height: true,
        }
    }
}
