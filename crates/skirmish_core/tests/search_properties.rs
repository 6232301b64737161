//! Property tests for the movement search, visibility math, and damage
//! formula.

use std::collections::HashSet;

use proptest::prelude::*;

use skirmish_core::combat::attack_damage;
use skirmish_core::grid::{Cell, Grid};
use skirmish_core::movement::reachable;
use skirmish_core::terrain::Terrain;
use skirmish_core::unit::{Team, Unit, UnitClass, UnitId};
use skirmish_core::visibility::occlusion_penalty;

const TERRAIN_CHOICES: [Terrain; 4] =
    [Terrain::Grass, Terrain::Forest, Terrain::Road, Terrain::Wall];

/// A random small battlefield with mixed terrain and elevation.
fn arb_grid() -> impl Strategy<Value = Grid> {
    (2usize..8, 2usize..8)
        .prop_flat_map(|(h, w)| {
            (
                proptest::collection::vec(
                    proptest::collection::vec(0usize..TERRAIN_CHOICES.len(), w),
                    h,
                ),
                proptest::collection::vec(proptest::collection::vec(-10i32..=10, w), h),
            )
        })
        .prop_map(|(codes, elevation)| {
            let terrain = codes
                .into_iter()
                .map(|row| row.into_iter().map(|i| TERRAIN_CHOICES[i]).collect())
                .collect();
            Grid::new(terrain, elevation).expect("generated layers share dimensions")
        })
}

/// Shortest grounded path cost to every cell, by exhaustive relaxation.
/// Slow but obviously correct; the search under test must agree with it.
fn relaxed_costs(grid: &Grid, start: Cell) -> Vec<Vec<Option<u32>>> {
    let h = grid.height() as usize;
    let w = grid.width() as usize;
    let mut cost: Vec<Vec<Option<u32>>> = vec![vec![None; w]; h];
    cost[start.y as usize][start.x as usize] = Some(0);
    loop {
        let mut changed = false;
        for y in 0..h {
            for x in 0..w {
                let Some(here) = cost[y][x] else { continue };
                for (dy, dx) in [(-1i32, 0i32), (1, 0), (0, -1), (0, 1)] {
                    let (ny, nx) = (y as i32 + dy, x as i32 + dx);
                    if ny < 0 || nx < 0 || ny >= h as i32 || nx >= w as i32 {
                        continue;
                    }
                    let next = Cell::new(ny as u16, nx as u16);
                    let Some(step) = grid.move_cost(next) else {
                        continue;
                    };
                    let candidate = here + step;
                    let slot = &mut cost[ny as usize][nx as usize];
                    if slot.map_or(true, |c| candidate < c) {
                        *slot = Some(candidate);
                        changed = true;
                    }
                }
            }
        }
        if !changed {
            break;
        }
    }
    cost
}

fn lone_unit(grid: &Grid, class: UnitClass) -> Unit {
    // Parks the unit at the first passable cell; falls back to (0,0).
    let start = grid
        .cells()
        .find(|&c| grid.move_cost(c).is_some())
        .unwrap_or(Cell::new(0, 0));
    Unit::new(UnitId::new(1), Team::A, class, start)
}

proptest! {
    /// Every cell the search returns for a lone ground unit is exactly a
    /// cell whose true shortest-path cost fits the movement budget.
    #[test]
    fn prop_ground_reachable_matches_shortest_paths(grid in arb_grid()) {
        let unit = lone_unit(&grid, UnitClass::Melee);
        prop_assume!(grid.move_cost(unit.pos).is_some());

        let reach = reachable(&grid, &[unit.clone()], &unit);
        let costs = relaxed_costs(&grid, unit.pos);

        for cell in grid.cells() {
            let true_cost = costs[cell.y as usize][cell.x as usize];
            let expected = cell != unit.pos
                && true_cost.map_or(false, |c| c <= unit.movement);
            prop_assert_eq!(
                reach.contains(&cell),
                expected,
                "cell ({},{}) true cost {:?}",
                cell.y,
                cell.x,
                true_cost
            );
        }
    }

    /// A lone flyer's reachable set is exactly the Manhattan disk of its
    /// movement budget, clipped to the grid, regardless of terrain.
    #[test]
    fn prop_flyer_reachable_is_a_manhattan_disk(grid in arb_grid()) {
        let unit = lone_unit(&grid, UnitClass::Flyer);
        let reach = reachable(&grid, &[unit.clone()], &unit);

        let disk: HashSet<Cell> = grid
            .cells()
            .filter(|&c| c != unit.pos && unit.pos.manhattan(c) <= unit.movement)
            .collect();
        prop_assert_eq!(reach, disk);
    }

    /// Damage never drops below 1 and otherwise equals attack minus
    /// defense.
    #[test]
    fn prop_damage_is_floored(atk in 0u32..1000, def in 0u32..1000) {
        let damage = attack_damage(atk, def);
        prop_assert!(damage >= 1);
        if atk > def {
            prop_assert_eq!(damage, atk - def);
        } else {
            prop_assert_eq!(damage, 1);
        }
    }

    /// Occlusion is symmetric: the scan from A to B charges the same
    /// penalty as the scan from B to A.
    #[test]
    fn prop_occlusion_is_symmetric(grid in arb_grid(), seed in any::<u64>()) {
        let cells: Vec<Cell> = grid.cells().collect();
        let a = cells[(seed % cells.len() as u64) as usize];
        let b = cells[((seed / 7) % cells.len() as u64) as usize];
        prop_assert_eq!(
            occlusion_penalty(&grid, a, b),
            occlusion_penalty(&grid, b, a)
        );
    }
}
