//! Match session: turn state machine, selection, and the action/query API.
//!
//! The session is the single owner of all match state. Callers (a renderer,
//! an input loop, a scripted test) drive it one action at a time; every
//! action either completes and mutates state or is rejected with a typed
//! reason and leaves state untouched. Two-phase interactions (pick a unit,
//! then pick a destination or target) are explicit, inspectable sub-states
//! rather than nested input loops, so any event source can drive them.

use std::collections::{HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::combat::resolve_attack;
use crate::error::{ActionError, LoadError};
use crate::grid::{Cell, Grid};
use crate::movement::reachable;
use crate::terrain::Terrain;
use crate::unit::{Placement, Team, Unit, UnitId};
use crate::visibility::attackable;

/// Maximum number of retained log entries; older entries are dropped.
pub const LOG_CAPACITY: usize = 200;

/// Whether the match is still being played or has been decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MatchState {
    /// Both teams still have living units.
    #[default]
    Playing,
    /// The named team wiped out the other and won. Terminal: every further
    /// action is rejected.
    Won(Team),
}

/// The session's current interaction sub-state.
///
/// `AwaitingMoveTarget` and `AwaitingAttackTarget` cache the option set
/// computed when the interaction began, so a confirm is validated against
/// exactly what the caller was shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum InteractionMode {
    /// No two-phase interaction in progress.
    #[default]
    Idle,
    /// A move was begun; waiting for a destination.
    AwaitingMoveTarget {
        /// Legal destinations for the selected unit.
        options: HashSet<Cell>,
    },
    /// An attack was begun; waiting for a target.
    AwaitingAttackTarget {
        /// Legal targets for the selected unit, in roster order.
        targets: Vec<UnitId>,
    },
}

/// One running match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    grid: Grid,
    /// Units in creation order; ids are indices + 1 and are never reused.
    units: Vec<Unit>,
    active_team: Team,
    turn: u32,
    selected: Option<UnitId>,
    mode: InteractionMode,
    state: MatchState,
    log: VecDeque<String>,
}

impl Session {
    /// Start a match on the given grid with the given unit placements.
    ///
    /// Team A acts first, turn counter starts at 1.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::PlacementOutOfBounds`] or
    /// [`LoadError::PlacementOccupied`] for invalid placements; no session
    /// is constructed in that case.
    pub fn new(grid: Grid, placements: &[Placement]) -> Result<Self, LoadError> {
        let mut units = Vec::with_capacity(placements.len());
        let mut taken: HashSet<Cell> = HashSet::new();
        for (i, p) in placements.iter().enumerate() {
            if !grid.in_bounds(p.cell) {
                return Err(LoadError::PlacementOutOfBounds { cell: p.cell });
            }
            if !taken.insert(p.cell) {
                return Err(LoadError::PlacementOccupied { cell: p.cell });
            }
            units.push(Unit::new(UnitId::new(i as u32 + 1), p.team, p.class, p.cell));
        }

        let mut session = Self {
            grid,
            units,
            active_team: Team::A,
            turn: 1,
            selected: None,
            mode: InteractionMode::Idle,
            state: MatchState::Playing,
            log: VecDeque::new(),
        };
        session.push_log("Match started. Team A begins.".to_owned());
        Ok(session)
    }

    // ------------------------------------------------------------------
    // Action API
    // ------------------------------------------------------------------

    /// Select the living active-team unit at `cell`. Selecting any other
    /// cell (empty, enemy, or a corpse) clears the selection instead of
    /// erroring. Either way the interaction mode resets to idle.
    pub fn select(&mut self, cell: Cell) -> Result<String, ActionError> {
        self.ensure_playing()?;
        self.mode = InteractionMode::Idle;

        let hit = self
            .living_unit_at(cell)
            .filter(|u| u.team == self.active_team)
            .map(|u| (u.id, u.symbol(), u.pos));

        let line = match hit {
            Some((id, symbol, pos)) => {
                self.selected = Some(id);
                format!("Selected {symbol}{id} at ({},{}).", pos.y, pos.x)
            }
            None => {
                self.selected = None;
                "Selection cleared.".to_owned()
            }
        };
        tracing::debug!(team = %self.active_team, selected = ?self.selected, "selection changed");
        self.push_log(line.clone());
        Ok(line)
    }

    /// Begin a move for the selected unit: computes its reachable set and
    /// enters [`InteractionMode::AwaitingMoveTarget`].
    pub fn begin_move(&mut self) -> Result<String, ActionError> {
        self.ensure_playing()?;
        let unit = self.selected_unit()?;
        if unit.moved {
            return Err(ActionError::AlreadyMoved);
        }

        let options = reachable(&self.grid, &self.units, unit);
        if options.is_empty() {
            return Err(ActionError::NoDestinations);
        }

        let line = format!(
            "{}{}: choose a destination ({} cells).",
            unit.symbol(),
            unit.id,
            options.len()
        );
        self.mode = InteractionMode::AwaitingMoveTarget { options };
        self.push_log(line.clone());
        Ok(line)
    }

    /// Confirm the pending move to `cell`.
    pub fn confirm_move(&mut self, cell: Cell) -> Result<String, ActionError> {
        self.ensure_playing()?;
        let InteractionMode::AwaitingMoveTarget { ref options } = self.mode else {
            return Err(ActionError::WrongMode);
        };
        if !options.contains(&cell) {
            return Err(ActionError::NotReachable { cell });
        }
        let id = self.selected.ok_or(ActionError::NoSelection)?;

        let unit = self.unit_mut(id);
        unit.pos = cell;
        unit.moved = true;
        let line = format!("{}{} moved to ({},{}).", unit.symbol(), id, cell.y, cell.x);

        self.mode = InteractionMode::Idle;
        tracing::debug!(unit = %id, y = cell.y, x = cell.x, "unit moved");
        self.push_log(line.clone());
        Ok(line)
    }

    /// Cancel a pending move and return to idle.
    pub fn cancel_move(&mut self) -> Result<String, ActionError> {
        self.ensure_playing()?;
        if !matches!(self.mode, InteractionMode::AwaitingMoveTarget { .. }) {
            return Err(ActionError::WrongMode);
        }
        self.mode = InteractionMode::Idle;
        let line = "Move cancelled.".to_owned();
        self.push_log(line.clone());
        Ok(line)
    }

    /// Begin an attack for the selected unit: computes its attackable set
    /// and enters [`InteractionMode::AwaitingAttackTarget`].
    pub fn begin_attack(&mut self) -> Result<String, ActionError> {
        self.ensure_playing()?;
        let unit = self.selected_unit()?;
        if unit.attacked {
            return Err(ActionError::AlreadyAttacked);
        }

        let targets = attackable(&self.grid, &self.units, unit);
        if targets.is_empty() {
            return Err(ActionError::NoTargets);
        }

        let line = format!(
            "{}{}: choose a target ({} in range and sight).",
            unit.symbol(),
            unit.id,
            targets.len()
        );
        self.mode = InteractionMode::AwaitingAttackTarget { targets };
        self.push_log(line.clone());
        Ok(line)
    }

    /// Confirm the pending attack against `target`.
    ///
    /// On a kill, the victory evaluator runs and may put the session into
    /// its terminal state.
    pub fn confirm_attack(&mut self, target: UnitId) -> Result<String, ActionError> {
        self.ensure_playing()?;
        let InteractionMode::AwaitingAttackTarget { ref targets } = self.mode else {
            return Err(ActionError::WrongMode);
        };
        if !targets.contains(&target) {
            return Err(ActionError::TargetNotAttackable(target));
        }
        let attacker_id = self.selected.ok_or(ActionError::NoSelection)?;

        let report = {
            let (attacker, defender) = self.unit_pair_mut(attacker_id, target);
            resolve_attack(attacker, defender)
        };

        let attacker = self.unit(attacker_id);
        let defender = self.unit(target);
        let mut line = format!(
            "{}{} attacked {}{} for {} damage.",
            attacker.symbol(),
            attacker_id,
            defender.symbol(),
            target,
            report.damage
        );
        if report.defeated {
            line.push_str(&format!(" {}{} was defeated!", defender.symbol(), target));
        }

        self.mode = InteractionMode::Idle;
        tracing::debug!(
            attacker = %attacker_id,
            defender = %target,
            damage = report.damage,
            defeated = report.defeated,
            "attack resolved"
        );
        self.push_log(line.clone());
        self.drop_dead_selection();
        self.refresh_match_state();
        Ok(line)
    }

    /// Cancel a pending attack and return to idle.
    pub fn cancel_attack(&mut self) -> Result<String, ActionError> {
        self.ensure_playing()?;
        if !matches!(self.mode, InteractionMode::AwaitingAttackTarget { .. }) {
            return Err(ActionError::WrongMode);
        }
        self.mode = InteractionMode::Idle;
        let line = "Attack cancelled.".to_owned();
        self.push_log(line.clone());
        Ok(line)
    }

    /// End the active team's turn.
    ///
    /// Flips the active team, increments the turn counter, clears selection
    /// and interaction mode, and resets the `moved`/`attacked` flags of
    /// every living unit of the team that is now becoming active. The
    /// finished team's flags are left as they ended.
    pub fn end_turn(&mut self) -> Result<String, ActionError> {
        self.ensure_playing()?;
        let finished = self.active_team;
        self.active_team = finished.opponent();
        self.turn += 1;

        for unit in &mut self.units {
            if unit.team == self.active_team && unit.is_alive() {
                unit.reset_turn();
            }
        }

        self.selected = None;
        self.mode = InteractionMode::Idle;
        let line = format!(
            "End of Team {finished} turn. Team {} is up (turn {}).",
            self.active_team, self.turn
        );
        tracing::debug!(turn = self.turn, active = %self.active_team, "turn ended");
        self.push_log(line.clone());
        Ok(line)
    }

    // ------------------------------------------------------------------
    // Query API (read-only snapshots)
    // ------------------------------------------------------------------

    /// The battlefield grid.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Terrain at a cell, if in bounds.
    #[must_use]
    pub fn terrain_at(&self, cell: Cell) -> Option<Terrain> {
        self.grid.terrain(cell)
    }

    /// Elevation level (1..=5) at a cell, if in bounds.
    #[must_use]
    pub fn elevation_level_at(&self, cell: Cell) -> Option<u8> {
        self.grid.elevation_level(cell)
    }

    /// The living unit occupying a cell, if any.
    #[must_use]
    pub fn living_unit_at(&self, cell: Cell) -> Option<&Unit> {
        self.units.iter().find(|u| u.is_alive() && u.pos == cell)
    }

    /// Look up a unit by id (alive or dead).
    #[must_use]
    pub fn unit_by_id(&self, id: UnitId) -> Option<&Unit> {
        let idx = id.as_u32().checked_sub(1)? as usize;
        self.units.get(idx)
    }

    /// All units in creation order, dead ones included.
    #[must_use]
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// The currently selected unit's id, if a selection exists.
    #[must_use]
    pub const fn selected(&self) -> Option<UnitId> {
        self.selected
    }

    /// The current interaction sub-state.
    #[must_use]
    pub const fn mode(&self) -> &InteractionMode {
        &self.mode
    }

    /// The team whose turn it is.
    #[must_use]
    pub const fn active_team(&self) -> Team {
        self.active_team
    }

    /// The turn counter. Starts at 1 and increments on every team switch.
    #[must_use]
    pub const fn turn(&self) -> u32 {
        self.turn
    }

    /// Whether the match is still in progress or already decided.
    #[must_use]
    pub const fn match_state(&self) -> MatchState {
        self.state
    }

    /// The reachable set of the selected unit, freshly computed. `None`
    /// without a selection. Intended for range display before a move is
    /// begun.
    #[must_use]
    pub fn reachable_for_selected(&self) -> Option<HashSet<Cell>> {
        let unit = self.unit_by_id(self.selected?)?;
        Some(reachable(&self.grid, &self.units, unit))
    }

    /// The attackable set of the selected unit, freshly computed. `None`
    /// without a selection.
    #[must_use]
    pub fn attackable_for_selected(&self) -> Option<Vec<UnitId>> {
        let unit = self.unit_by_id(self.selected?)?;
        Some(attackable(&self.grid, &self.units, unit))
    }

    /// The most recent log entries, oldest first, at most `n` of them.
    pub fn recent_log(&self, n: usize) -> impl Iterator<Item = &str> {
        let skip = self.log.len().saturating_sub(n);
        self.log.iter().skip(skip).map(String::as_str)
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn ensure_playing(&self) -> Result<(), ActionError> {
        match self.state {
            MatchState::Playing => Ok(()),
            MatchState::Won(_) => Err(ActionError::MatchOver),
        }
    }

    /// The selected unit, validated to be a living member of the active
    /// team.
    fn selected_unit(&self) -> Result<&Unit, ActionError> {
        let id = self.selected.ok_or(ActionError::NoSelection)?;
        let unit = self.unit_by_id(id).ok_or(ActionError::NoSelection)?;
        if !unit.is_alive() {
            return Err(ActionError::NoSelection);
        }
        if unit.team != self.active_team {
            return Err(ActionError::NotYourUnit);
        }
        Ok(unit)
    }

    fn unit(&self, id: UnitId) -> &Unit {
        &self.units[(id.as_u32() - 1) as usize]
    }

    fn unit_mut(&mut self, id: UnitId) -> &mut Unit {
        &mut self.units[(id.as_u32() - 1) as usize]
    }

    /// Disjoint mutable borrows of two distinct units.
    fn unit_pair_mut(&mut self, a: UnitId, b: UnitId) -> (&mut Unit, &mut Unit) {
        let ia = (a.as_u32() - 1) as usize;
        let ib = (b.as_u32() - 1) as usize;
        debug_assert_ne!(ia, ib);
        if ia < ib {
            let (left, right) = self.units.split_at_mut(ib);
            (&mut left[ia], &mut right[0])
        } else {
            let (left, right) = self.units.split_at_mut(ia);
            (&mut right[0], &mut left[ib])
        }
    }

    /// Clear the selection if the unit it refers to is no longer alive.
    fn drop_dead_selection(&mut self) {
        if let Some(id) = self.selected {
            if self.unit_by_id(id).map_or(true, |u| !u.is_alive()) {
                self.selected = None;
            }
        }
    }

    /// Re-evaluate victory. A team with zero living units loses; the session
    /// then stops accepting actions.
    fn refresh_match_state(&mut self) {
        if self.state != MatchState::Playing {
            return;
        }
        let a_alive = self.living_count(Team::A);
        let b_alive = self.living_count(Team::B);
        let winner = match (a_alive, b_alive) {
            (0, n) if n > 0 => Some(Team::B),
            (n, 0) if n > 0 => Some(Team::A),
            _ => None,
        };
        if let Some(team) = winner {
            self.state = MatchState::Won(team);
            self.selected = None;
            self.mode = InteractionMode::Idle;
            let line = format!("Team {team} wins!");
            tracing::debug!(winner = %team, "match decided");
            self.push_log(line);
        }
    }

    fn living_count(&self, team: Team) -> usize {
        self.units
            .iter()
            .filter(|u| u.team == team && u.is_alive())
            .count()
    }

    fn push_log(&mut self, line: String) {
        if self.log.len() == LOG_CAPACITY {
            self.log.pop_front();
        }
        self.log.push_back(line);
    }
}
