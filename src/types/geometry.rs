use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GridError;

/// Pixel measurements of the owning grid.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridGeometry {
    pub grid_height: f64,
    pub grid_width: f64,
    pub header_height: f64,
    pub footer_height: f64,
    /// Width reserved for a vertical scrollbar
    pub scrollbar_width: f64,
}

/// Which pane a render container renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaneName {
    /// The scrollable body pane
    Body,
    /// Columns pinned to the left
    Left,
    /// Columns pinned to the right
    Right,
}

impl PaneName {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Body => "body",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl FromStr for PaneName {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "body" => Ok(Self::Body),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            other => Err(GridError::InvalidConfig(format!("unknown pane '{other}'"))),
        }
    }
}

impl fmt::Display for PaneName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of the most recent vertical scroll, as tracked by the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollDirection {
    #[default]
    None,
    Up,
    Down,
}
