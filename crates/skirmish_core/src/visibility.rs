//! Target enumeration under range and effective-sight limits.
//!
//! Sight lines are sampled, not ray-cast: when attacker and target share a
//! row or column every cell between them (endpoints included) is checked;
//! otherwise `max(|dy|, |dx|) + 1` evenly spaced points are interpolated and
//! rounded to the nearest cell. Diagonal lines may therefore undercount or
//! overcount occluders near cell boundaries. This approximation is the
//! intended behavior, kept for compatibility with the established ruleset.

use crate::grid::{Cell, Grid};
use crate::unit::{Unit, UnitId};

/// Divisor applied to the raw elevation difference between attacker and
/// target before it is charged against sight.
const ELEVATION_SIGHT_DIVISOR: i32 = 3;

/// Round `from + (to - from) * step / steps` to the nearest integer,
/// ties away from the lower value. Pure integer arithmetic.
#[inline]
fn lerp_round(from: u16, to: u16, step: u32, steps: u32) -> u16 {
    let from = i64::from(from);
    let delta = i64::from(to) - from;
    let num = from * i64::from(steps) + delta * i64::from(step);
    let den = i64::from(steps);
    // num/den is always >= 0 here.
    ((2 * num + den) / (2 * den)) as u16
}

/// Total sight penalty from occluding terrain sampled along the line from
/// `from` to `to`, endpoints included.
#[must_use]
pub fn occlusion_penalty(grid: &Grid, from: Cell, to: Cell) -> u32 {
    let mut penalty = 0;
    let mut charge = |cell: Cell| {
        if let Some(terrain) = grid.terrain(cell) {
            if terrain.blocks_sight() {
                penalty += terrain.sight_penalty();
            }
        }
    };

    if from.y == to.y {
        for x in from.x.min(to.x)..=from.x.max(to.x) {
            charge(Cell::new(from.y, x));
        }
    } else if from.x == to.x {
        for y in from.y.min(to.y)..=from.y.max(to.y) {
            charge(Cell::new(y, from.x));
        }
    } else {
        let steps = u32::from(from.y.abs_diff(to.y).max(from.x.abs_diff(to.x)));
        for i in 0..=steps {
            let y = lerp_round(from.y, to.y, i, steps);
            let x = lerp_round(from.x, to.x, i, steps);
            charge(Cell::new(y, x));
        }
    }
    penalty
}

/// A unit's effective sight toward a target cell: base sight minus the
/// elevation-difference penalty minus occlusion along the line, floored
/// at zero.
#[must_use]
pub fn effective_sight(grid: &Grid, unit: &Unit, target: Cell) -> u32 {
    let mut sight = i64::from(unit.sight);

    let own_elev = grid.elevation(unit.pos).unwrap_or(0);
    let target_elev = grid.elevation(target).unwrap_or(0);
    let elev_penalty = (own_elev - target_elev).abs() / ELEVATION_SIGHT_DIVISOR;
    sight -= i64::from(elev_penalty.max(0));

    sight -= i64::from(occlusion_penalty(grid, unit.pos, target));

    sight.max(0) as u32
}

/// Enumerate the living enemies the unit may attack this turn, in roster
/// order.
///
/// An enemy qualifies iff its Manhattan distance is within both the unit's
/// attack range and its effective sight toward the enemy's cell. Choosing
/// among several qualifying targets is the caller's concern.
#[must_use]
pub fn attackable(grid: &Grid, units: &[Unit], unit: &Unit) -> Vec<UnitId> {
    units
        .iter()
        .filter(|o| o.team != unit.team && o.is_alive())
        .filter(|o| {
            let d = unit.distance_to(o.pos);
            d <= unit.range && d <= effective_sight(grid, unit, o.pos)
        })
        .map(|o| o.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::Terrain;
    use crate::unit::{Team, UnitClass, UnitId};

    fn grid_from(terrain: Vec<Vec<Terrain>>, elevation: Vec<Vec<i32>>) -> Grid {
        Grid::new(terrain, elevation).unwrap()
    }

    fn flat_grass(height: usize, width: usize) -> Grid {
        grid_from(
            vec![vec![Terrain::Grass; width]; height],
            vec![vec![0; width]; height],
        )
    }

    fn unit_at(id: u32, team: Team, class: UnitClass, y: u16, x: u16) -> Unit {
        Unit::new(UnitId::new(id), team, class, Cell::new(y, x))
    }

    #[test]
    fn test_range_limits_targets() {
        let grid = flat_grass(1, 10);
        // Ranged: range 4, sight 5.
        let archer = unit_at(1, Team::A, UnitClass::Ranged, 0, 0);
        let near = unit_at(2, Team::B, UnitClass::Melee, 0, 4);
        let far = unit_at(3, Team::B, UnitClass::Melee, 0, 5);
        let units = vec![archer.clone(), near.clone(), far];

        assert_eq!(attackable(&grid, &units, &archer), vec![near.id]);
    }

    #[test]
    fn test_sight_limits_before_range() {
        // Melee has range 1 but sight 3; a target at distance 1 behind
        // enough occlusion still drops out once sight reaches 0.
        let mut terrain = vec![vec![Terrain::Forest; 2]; 1];
        terrain[0][0] = Terrain::Forest;
        let grid = grid_from(terrain, vec![vec![0; 2]; 1]);

        let melee = unit_at(1, Team::A, UnitClass::Melee, 0, 0);
        let enemy = unit_at(2, Team::B, UnitClass::Melee, 0, 1);
        let units = vec![melee.clone(), enemy.clone()];

        // Both endpoint cells are forest: sight 3 - 2 = 1, distance 1. Still
        // attackable.
        assert_eq!(attackable(&grid, &units, &melee), vec![enemy.id]);
        assert_eq!(effective_sight(&grid, &melee, enemy.pos), 1);
    }

    #[test]
    fn test_forest_row_occlusion_counts_endpoints() {
        // Archer at (0,0), enemy at (0,4), forest at (0,2) and (0,4):
        // effective sight 5 - 2 = 3 < 4, so the shot is blocked.
        let mut terrain = vec![vec![Terrain::Grass; 5]; 1];
        terrain[0][2] = Terrain::Forest;
        terrain[0][4] = Terrain::Forest;
        let grid = grid_from(terrain, vec![vec![0; 5]; 1]);

        let archer = unit_at(1, Team::A, UnitClass::Ranged, 0, 0);
        let enemy = unit_at(2, Team::B, UnitClass::Melee, 0, 4);
        let units = vec![archer.clone(), enemy];

        assert_eq!(effective_sight(&grid, &archer, Cell::new(0, 4)), 3);
        assert!(attackable(&grid, &units, &archer).is_empty());
    }

    #[test]
    fn test_column_occlusion() {
        let mut terrain = vec![vec![Terrain::Grass; 1]; 5];
        terrain[1][0] = Terrain::Forest;
        terrain[3][0] = Terrain::Forest;
        let grid = grid_from(terrain, vec![vec![0; 1]; 5]);

        let unit = unit_at(1, Team::A, UnitClass::Ranged, 0, 0);
        assert_eq!(occlusion_penalty(&grid, unit.pos, Cell::new(4, 0)), 2);
        assert_eq!(effective_sight(&grid, &unit, Cell::new(4, 0)), 3);
    }

    #[test]
    fn test_elevation_difference_penalty() {
        // The raw elevation difference is divided by 3, truncating.
        let grid = grid_from(
            vec![vec![Terrain::Grass; 3]; 1],
            vec![vec![-3, 0, 2]],
        );
        let unit = unit_at(1, Team::A, UnitClass::Ranged, 0, 0);

        // |(-3) - 2| = 5 -> penalty 1.
        assert_eq!(effective_sight(&grid, &unit, Cell::new(0, 2)), 4);
        // |(-3) - 0| = 3 -> penalty 1.
        assert_eq!(effective_sight(&grid, &unit, Cell::new(0, 1)), 4);
    }

    #[test]
    fn test_effective_sight_floors_at_zero() {
        let grid = grid_from(
            vec![vec![Terrain::Forest; 6]; 1],
            vec![vec![0; 6]; 1],
        );
        let unit = unit_at(1, Team::A, UnitClass::Melee, 0, 0);
        // Six forest cells sampled: 3 - 6 would be negative.
        assert_eq!(effective_sight(&grid, &unit, Cell::new(0, 5)), 0);
    }

    #[test]
    fn test_diagonal_sampling() {
        // Attacker (0,0), target (2,3): steps = 3, samples at interpolated
        // points (0,0), (1,1), (1,2), (2,3). Forest at (1,1) and (2,2)
        // means only the (1,1) sample is charged.
        let mut terrain = vec![vec![Terrain::Grass; 4]; 3];
        terrain[1][1] = Terrain::Forest;
        terrain[2][2] = Terrain::Forest;
        let grid = grid_from(terrain, vec![vec![0; 4]; 3]);

        assert_eq!(occlusion_penalty(&grid, Cell::new(0, 0), Cell::new(2, 3)), 1);
    }

    #[test]
    fn test_diagonal_sampling_is_symmetric_for_reversed_endpoints() {
        let mut terrain = vec![vec![Terrain::Grass; 5]; 5];
        terrain[2][2] = Terrain::Forest;
        let grid = grid_from(terrain, vec![vec![0; 5]; 5]);

        let a = Cell::new(0, 1);
        let b = Cell::new(4, 3);
        // Sampling is an approximation; at minimum the exact-center occluder
        // must be seen from both directions.
        assert!(occlusion_penalty(&grid, a, b) >= 1);
        assert!(occlusion_penalty(&grid, b, a) >= 1);
    }

    #[test]
    fn test_dead_enemies_are_not_targets() {
        let grid = flat_grass(1, 3);
        let melee = unit_at(1, Team::A, UnitClass::Melee, 0, 0);
        let mut enemy = unit_at(2, Team::B, UnitClass::Melee, 0, 1);
        enemy.hp = 0;
        let units = vec![melee.clone(), enemy];

        assert!(attackable(&grid, &units, &melee).is_empty());
    }

    #[test]
    fn test_allies_are_not_targets() {
        let grid = flat_grass(1, 3);
        let melee = unit_at(1, Team::A, UnitClass::Melee, 0, 0);
        let ally = unit_at(2, Team::A, UnitClass::Melee, 0, 1);
        let units = vec![melee.clone(), ally];

        assert!(attackable(&grid, &units, &melee).is_empty());
    }

    #[test]
    fn test_lerp_round_midpoints() {
        // Halfway samples round up (away from the lower cell).
        assert_eq!(lerp_round(0, 1, 1, 2), 1);
        assert_eq!(lerp_round(0, 3, 1, 2), 2);
        assert_eq!(lerp_round(2, 2, 1, 3), 2);
        assert_eq!(lerp_round(0, 4, 0, 4), 0);
        assert_eq!(lerp_round(0, 4, 4, 4), 4);
    }
}
