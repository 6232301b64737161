//! Terrain attribute table and elevation bucketing.
//!
//! Terrain is a pure lookup: each kind carries an immutable movement cost,
//! a sight penalty, and an occlusion flag. Unknown map codes are a
//! configuration error and are rejected at load time, never at query time.

use serde::{Deserialize, Serialize};

/// Lowest raw elevation value a grid cell may carry.
pub const ELEVATION_MIN: i32 = -10;

/// Highest raw elevation value a grid cell may carry.
pub const ELEVATION_MAX: i32 = 10;

/// Number of discrete elevation levels.
pub const ELEVATION_LEVELS: u8 = 5;

/// Ground type of a grid cell.
///
/// Drives movement cost for grounded units and line-of-sight occlusion.
/// Flying units ignore terrain entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Terrain {
    /// Open grassland (cost 1).
    #[default]
    Grass,
    /// Dense forest (cost 2, occludes sight).
    Forest,
    /// Paved road (cost 1).
    Road,
    /// Solid wall. Impassable for grounded units, occludes sight.
    Wall,
}

impl Terrain {
    /// Movement cost paid by a grounded unit entering a cell of this kind.
    /// Returns `None` for impassable terrain.
    #[must_use]
    pub const fn move_cost(self) -> Option<u32> {
        match self {
            Self::Grass | Self::Road => Some(1),
            Self::Forest => Some(2),
            Self::Wall => None,
        }
    }

    /// Sight reduction charged per occluding cell of this kind sampled on a
    /// sight line.
    #[must_use]
    pub const fn sight_penalty(self) -> u32 {
        match self {
            Self::Grass | Self::Road => 0,
            Self::Forest | Self::Wall => 1,
        }
    }

    /// Whether cells of this kind count toward line-of-sight blocking.
    #[must_use]
    pub const fn blocks_sight(self) -> bool {
        matches!(self, Self::Forest | Self::Wall)
    }

    /// Whether grounded units may enter cells of this kind.
    #[must_use]
    pub const fn is_passable(self) -> bool {
        self.move_cost().is_some()
    }

    /// Single-character code used by the persisted map format.
    #[must_use]
    pub const fn code(self) -> char {
        match self {
            Self::Grass => 'G',
            Self::Forest => 'F',
            Self::Road => 'R',
            Self::Wall => 'W',
        }
    }

    /// Parse a map code. Returns `None` for unknown codes; the loader turns
    /// that into a fatal error.
    #[must_use]
    pub const fn from_code(code: char) -> Option<Self> {
        match code {
            'G' => Some(Self::Grass),
            'F' => Some(Self::Forest),
            'R' => Some(Self::Road),
            'W' => Some(Self::Wall),
            _ => None,
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Grass => "grass",
            Self::Forest => "forest",
            Self::Road => "road",
            Self::Wall => "wall",
        }
    }
}

/// Map a raw elevation value onto a discrete level in `1..=5`.
///
/// The raw value is clamped to [`ELEVATION_MIN`]..=[`ELEVATION_MAX`] and then
/// bucketed linearly into five equal-width bands. The mapping is total: every
/// input produces a level.
#[must_use]
pub fn elevation_level(raw: i32) -> u8 {
    let v = raw.clamp(ELEVATION_MIN, ELEVATION_MAX);
    let span = ELEVATION_MAX - ELEVATION_MIN + 1;
    let idx = ((v - ELEVATION_MIN) * i32::from(ELEVATION_LEVELS) / span)
        .clamp(0, i32::from(ELEVATION_LEVELS) - 1);
    idx as u8 + 1
}
