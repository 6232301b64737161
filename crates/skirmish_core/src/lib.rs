//! # Skirmish Core
//!
//! Deterministic simulation core for a two-team, hot-seat tactical
//! skirmish on a grid battlefield.
//!
//! This crate contains **only** deterministic logic:
//! - No rendering
//! - No IO
//! - No randomness
//! - No floating-point math (integer arithmetic throughout)
//!
//! The same session driven with the same action sequence always produces
//! the same state, which makes scripted matches, replays, and headless
//! testing straightforward.
//!
//! ## Crate Structure
//!
//! - [`terrain`] - Terrain table and elevation banding
//! - [`grid`] - Battlefield grid of terrain and elevation
//! - [`unit`] - Teams, unit archetypes, and per-unit state
//! - [`movement`] - Reachable-set search over movement budgets
//! - [`visibility`] - Sight, occlusion, and target resolution
//! - [`combat`] - Deterministic attack resolution
//! - [`session`] - Match session, turn state machine, action/query API
//! - [`load`] - Map and elevation text formats, bundled sample data

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod combat;
pub mod error;
pub mod grid;
pub mod load;
pub mod movement;
pub mod session;
pub mod terrain;
pub mod unit;
pub mod visibility;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::combat::AttackReport;
    pub use crate::error::{ActionError, LoadError};
    pub use crate::grid::{Cell, Grid};
    pub use crate::load::{build_grid, default_placements, sample_grid};
    pub use crate::session::{InteractionMode, MatchState, Session};
    pub use crate::terrain::Terrain;
    pub use crate::unit::{Placement, Team, Unit, UnitClass, UnitId};
}
