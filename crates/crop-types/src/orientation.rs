use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Which edge(s) or corner of the crop rectangle a resize handle controls.
///
/// A drag with no orientation (`Option<Orientation>::None`) moves the whole
/// rectangle instead of resizing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    #[serde(rename = "n")]
    North,
    #[serde(rename = "ne")]
    NorthEast,
    #[serde(rename = "e")]
    East,
    #[serde(rename = "se")]
    SouthEast,
    #[serde(rename = "s")]
    South,
    #[serde(rename = "sw")]
    SouthWest,
    #[serde(rename = "w")]
    West,
    #[serde(rename = "nw")]
    NorthWest,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown orientation tag: {0:?}")]
pub struct ParseOrientationError(pub String);

impl Orientation {
    pub const ALL: &'static [Self] = &[
        Self::North,
        Self::NorthEast,
        Self::East,
        Self::SouthEast,
        Self::South,
        Self::SouthWest,
        Self::West,
        Self::NorthWest,
    ];

    /// The compass tag carried by the handle element (`data-ord`).
    pub fn tag(self) -> &'static str {
        match self {
            Orientation::North => "n",
            Orientation::NorthEast => "ne",
            Orientation::East => "e",
            Orientation::SouthEast => "se",
            Orientation::South => "s",
            Orientation::SouthWest => "sw",
            Orientation::West => "w",
            Orientation::NorthWest => "nw",
        }
    }

    /// Moves the top edge (y and height).
    pub fn has_north(self) -> bool {
        matches!(
            self,
            Orientation::North | Orientation::NorthEast | Orientation::NorthWest
        )
    }

    /// Moves the bottom edge (height).
    pub fn has_south(self) -> bool {
        matches!(
            self,
            Orientation::South | Orientation::SouthEast | Orientation::SouthWest
        )
    }

    /// Moves the right edge (width).
    pub fn has_east(self) -> bool {
        matches!(
            self,
            Orientation::East | Orientation::NorthEast | Orientation::SouthEast
        )
    }

    /// Moves the left edge (x and width).
    pub fn has_west(self) -> bool {
        matches!(
            self,
            Orientation::West | Orientation::NorthWest | Orientation::SouthWest
        )
    }

    pub fn is_corner(self) -> bool {
        self.tag().len() == 2
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl FromStr for Orientation {
    type Err = ParseOrientationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|o| o.tag() == s)
            .ok_or_else(|| ParseOrientationError(s.to_string()))
    }
}
