//! Movement-range planning: cost-limited least-cost search.
//!
//! Terrain costs vary, so the frontier must be expanded in least-cost order
//! (Dijkstra with a binary heap). A plain FIFO traversal can report a cell
//! at a cost above its true minimum when a cheap detour is discovered after
//! the cell was first reached, so reachability near the budget edge would be
//! wrong.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use crate::grid::{Cell, Grid};
use crate::unit::Unit;

/// Neighbor offsets for 4-directional movement (no diagonals).
const DIRECTIONS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// A node in the open-set priority queue.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
struct SearchNode {
    cell: Cell,
    /// Accumulated movement cost from the start cell.
    cost: u32,
    /// Tie-breaker for determinism: lower coordinates first.
    tie_breaker: u32,
}

impl Ord for SearchNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; reverse the comparison for min-heap
        // behavior. Lower cost = higher priority.
        match other.cost.cmp(&self.cost) {
            Ordering::Equal => other.tie_breaker.cmp(&self.tie_breaker),
            ord => ord,
        }
    }
}

impl PartialOrd for SearchNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[inline]
fn tie_breaker(cell: Cell) -> u32 {
    (u32::from(cell.y) << 16) | u32::from(cell.x)
}

/// Compute the set of cells a unit can legally end a move on this turn.
///
/// The result never contains the unit's own cell nor any cell occupied by a
/// living unit of either team. Grounded units pay each entered cell's
/// terrain cost and are blocked by impassable terrain and by living units;
/// flyers pay cost 1 per step, overfly anything, but still cannot land on an
/// occupied cell. A cell is reachable iff its true minimum accumulated cost
/// is at most the unit's movement budget.
#[must_use]
pub fn reachable(grid: &Grid, units: &[Unit], unit: &Unit) -> HashSet<Cell> {
    let occupied: HashSet<Cell> = units
        .iter()
        .filter(|u| u.is_alive() && u.id != unit.id)
        .map(|u| u.pos)
        .collect();

    let flying = unit.is_flying();
    let budget = unit.movement;

    let mut best: HashMap<Cell, u32> = HashMap::new();
    let mut open: BinaryHeap<SearchNode> = BinaryHeap::new();

    best.insert(unit.pos, 0);
    open.push(SearchNode {
        cell: unit.pos,
        cost: 0,
        tie_breaker: tie_breaker(unit.pos),
    });

    while let Some(node) = open.pop() {
        // Stale entry from an earlier, worse relaxation.
        if best.get(&node.cell).is_some_and(|&c| c < node.cost) {
            continue;
        }

        for &(dy, dx) in &DIRECTIONS {
            let ny = i32::from(node.cell.y) + dy;
            let nx = i32::from(node.cell.x) + dx;
            if ny < 0 || nx < 0 {
                continue;
            }
            let next = Cell::new(ny as u16, nx as u16);
            if !grid.in_bounds(next) {
                continue;
            }

            let step = if flying {
                1
            } else {
                // Impassable terrain and living units block grounded
                // traversal entirely.
                if occupied.contains(&next) {
                    continue;
                }
                match grid.move_cost(next) {
                    Some(cost) => cost,
                    None => continue,
                }
            };

            let next_cost = node.cost + step;
            if next_cost > budget {
                continue;
            }
            if best.get(&next).map_or(true, |&c| next_cost < c) {
                best.insert(next, next_cost);
                open.push(SearchNode {
                    cell: next,
                    cost: next_cost,
                    tie_breaker: tie_breaker(next),
                });
            }
        }
    }

    best.into_keys()
        .filter(|&cell| cell != unit.pos && !occupied.contains(&cell))
        .collect()
}
