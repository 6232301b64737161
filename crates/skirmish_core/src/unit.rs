//! Teams, unit archetypes, and per-unit state.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::grid::Cell;

/// One of the two opposing sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    /// First team; acts first.
    A,
    /// Second team.
    B,
}

impl Team {
    /// The opposing team.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::B => write!(f, "B"),
        }
    }
}

/// Stable identifier for a unit.
///
/// Ids are assigned sequentially at session construction and are never
/// reused, so a stored id stays valid for log and lookup purposes even
/// after the unit dies.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct UnitId(u32);

impl UnitId {
    /// Create an id from its raw value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Raw numeric value.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Base statistics shared by all units of one archetype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassStats {
    /// Maximum hit points.
    pub hp: u32,
    /// Attack strength.
    pub atk: u32,
    /// Defense value subtracted from incoming attacks.
    pub def: u32,
    /// Movement budget per turn.
    pub movement: u32,
    /// Attack range (Manhattan).
    pub range: u32,
    /// Base sight radius.
    pub sight: u32,
    /// Display symbol.
    pub symbol: char,
}

/// Unit archetype. Determines the stat template and whether terrain
/// movement costs apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitClass {
    /// Short-range bruiser.
    Melee,
    /// Fragile long-range attacker with wide sight.
    Ranged,
    /// Airborne unit; ignores terrain costs and obstacles while moving.
    Flyer,
}

impl UnitClass {
    /// The stat template for this archetype.
    #[must_use]
    pub const fn stats(self) -> ClassStats {
        match self {
            Self::Melee => ClassStats {
                hp: 12,
                atk: 6,
                def: 3,
                movement: 3,
                range: 1,
                sight: 3,
                symbol: 'M',
            },
            Self::Ranged => ClassStats {
                hp: 9,
                atk: 5,
                def: 2,
                movement: 2,
                range: 4,
                sight: 5,
                symbol: 'R',
            },
            Self::Flyer => ClassStats {
                hp: 10,
                atk: 5,
                def: 2,
                movement: 4,
                range: 1,
                sight: 4,
                symbol: 'V',
            },
        }
    }

    /// Check if this archetype flies.
    #[must_use]
    pub const fn is_flying(self) -> bool {
        matches!(self, Self::Flyer)
    }
}

/// Requested initial unit position, consumed at session construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    /// Owning team.
    pub team: Team,
    /// Archetype to instantiate.
    pub class: UnitClass,
    /// Starting cell.
    pub cell: Cell,
}

/// One unit on the battlefield.
///
/// Stats are copied out of the archetype template at creation so individual
/// units can diverge later. A unit with `hp == 0` is dead: it is skipped by
/// occupancy, targeting, and victory queries but stays in the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    /// Stable identifier.
    pub id: UnitId,
    /// Owning team.
    pub team: Team,
    /// Archetype.
    pub class: UnitClass,
    /// Current position.
    pub pos: Cell,
    /// Current hit points (0 = dead).
    pub hp: u32,
    /// Maximum hit points.
    pub max_hp: u32,
    /// Attack strength.
    pub atk: u32,
    /// Defense value.
    pub def: u32,
    /// Movement budget per turn.
    pub movement: u32,
    /// Attack range (Manhattan).
    pub range: u32,
    /// Base sight radius.
    pub sight: u32,
    /// Whether this unit has moved this turn.
    pub moved: bool,
    /// Whether this unit has attacked this turn.
    pub attacked: bool,
}

impl Unit {
    /// Instantiate a unit of the given archetype.
    #[must_use]
    pub fn new(id: UnitId, team: Team, class: UnitClass, pos: Cell) -> Self {
        let stats = class.stats();
        Self {
            id,
            team,
            class,
            pos,
            hp: stats.hp,
            max_hp: stats.hp,
            atk: stats.atk,
            def: stats.def,
            movement: stats.movement,
            range: stats.range,
            sight: stats.sight,
            moved: false,
            attacked: false,
        }
    }

    /// Check if this unit is alive.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Check if this unit ignores terrain while moving.
    #[must_use]
    pub const fn is_flying(&self) -> bool {
        self.class.is_flying()
    }

    /// Display symbol for this unit's archetype.
    #[must_use]
    pub const fn symbol(&self) -> char {
        self.class.stats().symbol
    }

    /// Manhattan distance from this unit to a cell.
    #[must_use]
    pub fn distance_to(&self, cell: Cell) -> u32 {
        self.pos.manhattan(cell)
    }

    /// Reduce hit points, flooring at zero.
    pub fn apply_damage(&mut self, damage: u32) {
        self.hp = self.hp.saturating_sub(damage);
    }

    /// Clear the turn-scoped action flags.
    pub fn reset_turn(&mut self) {
        self.moved = false;
        self.attacked = false;
    }
}
