//! Error types for the battle simulation.
//!
//! Two disjoint families: [`LoadError`] is fatal and prevents a session from
//! being constructed at all; [`ActionError`] is a synchronous rejection of a
//! single action, always leaving session state unchanged.

use thiserror::Error;

use crate::grid::Cell;
use crate::unit::UnitId;

/// Errors raised while parsing map data or constructing a session.
///
/// All of these fire before any session exists; no partial state is ever
/// observable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// The map contains a terrain code outside the terrain table.
    #[error("unknown terrain code '{code}' at row {row}, column {col}")]
    UnknownTerrainCode {
        /// The offending character.
        code: char,
        /// Zero-based row of the code.
        row: usize,
        /// Zero-based column of the code.
        col: usize,
    },

    /// Map rows are not all the same length.
    #[error("map row {row} differs in length from the first row")]
    RaggedMap {
        /// Zero-based index of the first offending row.
        row: usize,
    },

    /// An elevation token failed to parse as an integer.
    #[error("bad elevation value '{token}' at row {row}, column {col}")]
    BadElevation {
        /// The unparseable token.
        token: String,
        /// Zero-based row of the token.
        row: usize,
        /// Zero-based column of the token.
        col: usize,
    },

    /// The elevation grid dimensions do not match the map dimensions.
    #[error(
        "elevation grid is {elev_height}x{elev_width} but map is {map_height}x{map_width}"
    )]
    DimensionMismatch {
        /// Map height in rows.
        map_height: usize,
        /// Map width in columns.
        map_width: usize,
        /// Elevation height in rows.
        elev_height: usize,
        /// Elevation width in columns.
        elev_width: usize,
    },

    /// The map has no rows or no columns.
    #[error("map has no cells")]
    EmptyGrid,

    /// A unit placement lies outside the grid.
    #[error("unit placement at ({y},{x}) is out of bounds", y = cell.y, x = cell.x)]
    PlacementOutOfBounds {
        /// The offending cell.
        cell: Cell,
    },

    /// Two unit placements share a cell.
    #[error("unit placement at ({y},{x}) is already occupied", y = cell.y, x = cell.x)]
    PlacementOccupied {
        /// The contested cell.
        cell: Cell,
    },
}

/// Typed rejection of a session action.
///
/// Rejections are part of normal play, not failures: the session state is
/// guaranteed unchanged, and the reason is suitable for user display.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    /// The match has ended; only a fresh session can continue.
    #[error("the match is already over")]
    MatchOver,

    /// The action requires a selected unit and none is selected.
    #[error("no unit selected")]
    NoSelection,

    /// The selected unit does not belong to the active team.
    #[error("selected unit does not belong to the active team")]
    NotYourUnit,

    /// The selected unit has already moved this turn.
    #[error("unit already moved this turn")]
    AlreadyMoved,

    /// The selected unit has already attacked this turn.
    #[error("unit already attacked this turn")]
    AlreadyAttacked,

    /// The requested destination is not in the unit's reachable set.
    #[error("destination ({y},{x}) is not reachable", y = cell.y, x = cell.x)]
    NotReachable {
        /// The rejected destination.
        cell: Cell,
    },

    /// The unit has nowhere it can move this turn.
    #[error("no reachable destinations")]
    NoDestinations,

    /// No enemy is within both range and sight.
    #[error("no enemies in range or line of sight")]
    NoTargets,

    /// The chosen defender is not in the unit's attackable set.
    #[error("unit {0} is not attackable")]
    TargetNotAttackable(UnitId),

    /// The action does not apply in the current interaction mode.
    #[error("action does not apply in the current interaction mode")]
    WrongMode,
}
