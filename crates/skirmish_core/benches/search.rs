//! Search and targeting benchmarks for skirmish_core.
//!
//! Run with: `cargo bench -p skirmish_core`

// Benchmark binaries don't need docs on macro-generated functions
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use skirmish_core::grid::{Cell, Grid};
use skirmish_core::movement::reachable;
use skirmish_core::terrain::Terrain;
use skirmish_core::unit::{Team, Unit, UnitClass, UnitId};
use skirmish_core::visibility::attackable;

const SIZE: usize = 64;

/// A 64x64 battlefield with a repeating forest/road pattern and rolling
/// elevation, plus a scatter of units from both teams.
fn crowded_battlefield() -> (Grid, Vec<Unit>) {
    let mut terrain = vec![vec![Terrain::Grass; SIZE]; SIZE];
    let mut elevation = vec![vec![0i32; SIZE]; SIZE];
    for y in 0..SIZE {
        for x in 0..SIZE {
            terrain[y][x] = match (y + x) % 7 {
                0 | 1 => Terrain::Forest,
                2 => Terrain::Road,
                _ => Terrain::Grass,
            };
            elevation[y][x] = ((y * 3 + x) % 21) as i32 - 10;
        }
    }
    let grid = Grid::new(terrain, elevation).expect("generated layers share dimensions");

    let mut units = Vec::new();
    let mut id = 1;
    for y in (0..SIZE).step_by(8) {
        for x in (0..SIZE).step_by(8) {
            let team = if (y + x) % 16 == 0 { Team::A } else { Team::B };
            units.push(Unit::new(
                UnitId::new(id),
                team,
                UnitClass::Ranged,
                Cell::new(y as u16, x as u16),
            ));
            id += 1;
        }
    }
    (grid, units)
}

/// Measures the reachable-set search and target resolution on a crowded
/// battlefield.
pub fn search_benchmark(c: &mut Criterion) {
    let (grid, units) = crowded_battlefield();
    let mover = units[0].clone();

    c.bench_function("reachable_64x64", |b| {
        b.iter(|| black_box(reachable(&grid, &units, &mover)))
    });

    c.bench_function("attackable_64x64", |b| {
        b.iter(|| black_box(attackable(&grid, &units, &mover)))
    });
}

criterion_group!(benches, search_benchmark);
criterion_main!(benches);
