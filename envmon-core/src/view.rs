//! Text renderers for a snapshot.

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod grid;
pub mod tree;

pub use tree::{TreeNode, TreeView};

/// Shown by both views when there is nothing to render.
pub const NO_DATA: &str = "No data available";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Grid,
    Tree,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Grid => "grid",
            ViewMode::Tree => "tree",
        }
    }

    pub const fn all() -> &'static [ViewMode] {
        &[ViewMode::Grid, ViewMode::Tree]
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ViewMode {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "grid" => Ok(ViewMode::Grid),
            "tree" => Ok(ViewMode::Tree),
            _ => Err(anyhow::anyhow!("Unknown view '{value}'. Supported views: grid, tree.")),
        }
    }
}
