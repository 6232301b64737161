//! Battle grid: terrain and elevation storage with bounds checking.
//!
//! The grid is immutable after construction. Both the terrain array and the
//! elevation array are stored row-major; construction fails unless their
//! dimensions agree and are positive.

use serde::{Deserialize, Serialize};

use crate::error::LoadError;
use crate::terrain::{elevation_level, Terrain, ELEVATION_MAX, ELEVATION_MIN};

/// A grid coordinate, `(y, x)` with `y` growing downward.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct Cell {
    /// Row index.
    pub y: u16,
    /// Column index.
    pub x: u16,
}

impl Cell {
    /// Create a cell at `(y, x)`.
    #[must_use]
    pub const fn new(y: u16, x: u16) -> Self {
        Self { y, x }
    }

    /// Manhattan distance to another cell.
    #[must_use]
    pub fn manhattan(self, other: Self) -> u32 {
        u32::from(self.y.abs_diff(other.y)) + u32::from(self.x.abs_diff(other.x))
    }
}

/// Terrain and elevation data for one battlefield.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    /// Grid width in cells.
    width: u16,
    /// Grid height in cells.
    height: u16,
    /// Terrain kinds in row-major order.
    terrain: Vec<Terrain>,
    /// Raw elevation values in row-major order, clamped to `[-10, 10]`.
    elevation: Vec<i32>,
    /// Derived elevation level (1..=5) per cell.
    levels: Vec<u8>,
}

impl Grid {
    /// Build a grid from parallel terrain and elevation rows.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::EmptyGrid`] if either input has no rows or no
    /// columns, [`LoadError::RaggedMap`] if terrain rows differ in length,
    /// and [`LoadError::DimensionMismatch`] if the elevation rows do not
    /// match the terrain dimensions exactly.
    pub fn new(terrain: Vec<Vec<Terrain>>, elevation: Vec<Vec<i32>>) -> Result<Self, LoadError> {
        let height = terrain.len();
        let width = terrain.first().map_or(0, Vec::len);
        if height == 0 || width == 0 {
            return Err(LoadError::EmptyGrid);
        }
        if let Some(row) = terrain.iter().position(|r| r.len() != width) {
            return Err(LoadError::RaggedMap { row });
        }
        if elevation.len() != height || elevation.iter().any(|r| r.len() != width) {
            return Err(LoadError::DimensionMismatch {
                map_height: height,
                map_width: width,
                elev_height: elevation.len(),
                elev_width: elevation.first().map_or(0, Vec::len),
            });
        }

        let terrain: Vec<Terrain> = terrain.into_iter().flatten().collect();
        let elevation: Vec<i32> = elevation
            .into_iter()
            .flatten()
            .map(|v| v.clamp(ELEVATION_MIN, ELEVATION_MAX))
            .collect();
        let levels = elevation.iter().map(|&v| elevation_level(v)).collect();

        Ok(Self {
            width: width as u16,
            height: height as u16,
            terrain,
            elevation,
            levels,
        })
    }

    /// Grid width in cells.
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Grid height in cells.
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Check whether a cell lies within the grid.
    #[must_use]
    pub const fn in_bounds(&self, cell: Cell) -> bool {
        cell.y < self.height && cell.x < self.width
    }

    /// Convert a cell to its row-major index.
    #[inline]
    fn index(&self, cell: Cell) -> usize {
        cell.y as usize * self.width as usize + cell.x as usize
    }

    /// Terrain kind at a cell. Returns `None` out of bounds.
    #[must_use]
    pub fn terrain(&self, cell: Cell) -> Option<Terrain> {
        self.in_bounds(cell).then(|| self.terrain[self.index(cell)])
    }

    /// Raw elevation at a cell. Returns `None` out of bounds.
    #[must_use]
    pub fn elevation(&self, cell: Cell) -> Option<i32> {
        self.in_bounds(cell)
            .then(|| self.elevation[self.index(cell)])
    }

    /// Derived elevation level (1..=5) at a cell. Returns `None` out of bounds.
    #[must_use]
    pub fn elevation_level(&self, cell: Cell) -> Option<u8> {
        self.in_bounds(cell).then(|| self.levels[self.index(cell)])
    }

    /// Movement cost a grounded unit pays to enter a cell.
    /// `None` for impassable or out-of-bounds cells.
    #[must_use]
    pub fn move_cost(&self, cell: Cell) -> Option<u32> {
        self.terrain(cell).and_then(Terrain::move_cost)
    }

    /// Iterate over all cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Cell::new(y, x)))
    }
}
