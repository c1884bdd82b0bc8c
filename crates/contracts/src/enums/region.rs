use serde::{Deserialize, Serialize};
use std::fmt;

/// Sales regions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    East,
    West,
    North,
    South,
    Central,
}

impl Region {
    /// Region code as spelled in the source sheet
    pub fn code(&self) -> &'static str {
        match self {
            Region::East => "East",
            Region::West => "West",
            Region::North => "North",
            Region::South => "South",
            Region::Central => "Central",
        }
    }

    pub fn all() -> Vec<Region> {
        vec![
            Region::East,
            Region::West,
            Region::North,
            Region::South,
            Region::Central,
        ]
    }

    /// Parse from the source spelling
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "East" => Some(Region::East),
            "West" => Some(Region::West),
            "North" => Some(Region::North),
            "South" => Some(Region::South),
            "Central" => Some(Region::Central),
            _ => None,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
