// Core types for the Reflection sync protocol.
//
// These are shared between the codec (`wire.rs`, `message.rs`) and the game
// and session crates. They are wire-scoped representations: `Orientation`
// serializes to the lowercase strings the protocol and the Journal both use,
// and the dot/color aliases document intent without adding newtype overhead
// on an index that is just a position in a `Vec`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Position of a dot within the grid's flat dot list.
pub type DotIndex = usize;

/// Per-dot color state. Plain integer on the wire and in the Journal.
pub type ColorState = i64;

/// Reflection axis of the current grid. Fixed at grid creation; a change of
/// orientation always means a whole new game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Mirror across the horizontal axis (top half reflects into bottom).
    Horizontal,
    /// Mirror across the vertical axis (left half reflects into right).
    Vertical,
    /// Mirror across both axes.
    Bilateral,
}

impl Orientation {
    /// The lowercase string form used on the wire and in Journal metadata.
    pub fn as_str(self) -> &'static str {
        match self {
            Orientation::Horizontal => "horizontal",
            Orientation::Vertical => "vertical",
            Orientation::Bilateral => "bilateral",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for parsing an orientation string that is not one of the three
/// known lowercase forms.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown orientation: {0:?}")]
pub struct ParseOrientationError(pub String);

impl FromStr for Orientation {
    type Err = ParseOrientationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "horizontal" => Ok(Orientation::Horizontal),
            "vertical" => Ok(Orientation::Vertical),
            "bilateral" => Ok(Orientation::Bilateral),
            other => Err(ParseOrientationError(other.to_string())),
        }
    }
}
