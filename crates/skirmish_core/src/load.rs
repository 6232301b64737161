//! Text formats for maps and elevation data, plus a bundled sample
//! battlefield.
//!
//! A map is one line of terrain code characters per row; blank lines are
//! skipped. Elevation data is one line of comma-separated integers per row
//! and must match the map's dimensions exactly.

use crate::error::LoadError;
use crate::grid::{Cell, Grid};
use crate::terrain::Terrain;
use crate::unit::{Placement, Team, UnitClass};

/// Bundled sample terrain layout, 14 columns by 6 rows.
pub const SAMPLE_MAP: &str = "\
GGFFGGGGRRGGGG
GGFFGGGGRRGGFF
GGGGGGGGRRGGFF
FFGGRRRRRRGGGG
FFGGRRGGGGGGGG
GGGGRRGGGGGGGG
";

/// Elevation values matching [`SAMPLE_MAP`].
pub const SAMPLE_ELEVATION: &str = "\
0,0,2,2,0,0,0,0,0,0,1,1,3,3
0,0,2,2,0,0,0,0,0,0,1,1,3,3
0,0,0,0,0,-2,-2,0,0,0,1,1,0,0
4,4,0,0,0,-2,-2,0,0,0,0,0,0,0
4,4,0,0,0,0,0,0,0,0,0,0,-4,-4
0,0,0,0,0,0,0,6,6,0,0,0,-4,-4
";

/// Parse a terrain map from its text form.
///
/// # Errors
///
/// Returns [`LoadError::UnknownTerrainCode`] for an unrecognized character,
/// with its row and column.
pub fn parse_map(text: &str) -> Result<Vec<Vec<Terrain>>, LoadError> {
    let mut rows = Vec::new();
    for line in text.lines().filter(|l| !l.trim().is_empty()) {
        let row_idx = rows.len();
        let mut row = Vec::with_capacity(line.len());
        for (col, code) in line.trim().chars().enumerate() {
            let terrain = Terrain::from_code(code).ok_or(LoadError::UnknownTerrainCode {
                code,
                row: row_idx,
                col,
            })?;
            row.push(terrain);
        }
        rows.push(row);
    }
    Ok(rows)
}

/// Parse elevation data from its comma-separated text form.
///
/// # Errors
///
/// Returns [`LoadError::BadElevation`] for a field that does not parse as
/// an integer.
pub fn parse_elevation(text: &str) -> Result<Vec<Vec<i32>>, LoadError> {
    let mut rows = Vec::new();
    for line in text.lines().filter(|l| !l.trim().is_empty()) {
        let row_idx = rows.len();
        let mut row = Vec::new();
        for (col, field) in line.split(',').enumerate() {
            let value = field
                .trim()
                .parse::<i32>()
                .map_err(|_| LoadError::BadElevation {
                    token: field.trim().to_owned(),
                    row: row_idx,
                    col,
                })?;
            row.push(value);
        }
        rows.push(row);
    }
    Ok(rows)
}

/// Parse both layers and build a validated grid.
///
/// # Errors
///
/// Propagates parse errors plus the structural checks done by
/// [`Grid::new`] (ragged rows, dimension mismatch, empty input).
pub fn build_grid(map_text: &str, elevation_text: &str) -> Result<Grid, LoadError> {
    let terrain = parse_map(map_text)?;
    let elevation = parse_elevation(elevation_text)?;
    Grid::new(terrain, elevation)
}

/// The grid built from the bundled sample data.
///
/// The sample is known good, so this cannot fail.
#[must_use]
pub fn sample_grid() -> Grid {
    build_grid(SAMPLE_MAP, SAMPLE_ELEVATION)
        .unwrap_or_else(|e| unreachable!("bundled sample data is valid: {e}"))
}

/// Standard placements for a grid: three units per team, team A in the
/// top-left corner and team B mirrored into the bottom-right.
///
/// The grid must be at least 4x4 for the corners not to collide.
#[must_use]
pub fn default_placements(grid: &Grid) -> Vec<Placement> {
    let h = grid.height();
    let w = grid.width();
    vec![
        Placement {
            team: Team::A,
            class: UnitClass::Melee,
            cell: Cell::new(0, 1),
        },
        Placement {
            team: Team::A,
            class: UnitClass::Ranged,
            cell: Cell::new(1, 2),
        },
        Placement {
            team: Team::A,
            class: UnitClass::Flyer,
            cell: Cell::new(0, 3),
        },
        Placement {
            team: Team::B,
            class: UnitClass::Melee,
            cell: Cell::new(h - 1, w - 2),
        },
        Placement {
            team: Team::B,
            class: UnitClass::Ranged,
            cell: Cell::new(h - 2, w - 3),
        },
        Placement {
            team: Team::B,
            class: UnitClass::Flyer,
            cell: Cell::new(h - 1, w - 4),
        },
    ]
}
