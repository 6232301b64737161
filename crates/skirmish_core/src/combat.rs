//! Deterministic combat resolution.
//!
//! No dice: damage is a pure function of the two units' stats. A randomized
//! damage roll, if ever wanted, belongs in a layer above this one.

use serde::{Deserialize, Serialize};

use crate::unit::{Unit, UnitId};

/// Minimum damage an attack always deals, however high the defense.
pub const MIN_DAMAGE: u32 = 1;

/// Outcome of one resolved attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackReport {
    /// The attacking unit.
    pub attacker: UnitId,
    /// The defending unit.
    pub defender: UnitId,
    /// Damage applied.
    pub damage: u32,
    /// Defender's hit points after the attack.
    pub defender_hp: u32,
    /// Whether the defender died from this attack.
    pub defeated: bool,
}

/// Damage dealt by an attacker stat against a defender stat:
/// `max(1, atk - def)`.
#[must_use]
pub const fn attack_damage(atk: u32, def: u32) -> u32 {
    let raw = atk.saturating_sub(def);
    if raw < MIN_DAMAGE {
        MIN_DAMAGE
    } else {
        raw
    }
}

/// Resolve one attack: apply damage to the defender (hp floored at zero) and
/// mark the attacker as having attacked. Touches nothing else - not the
/// attacker's position, not its `moved` flag.
pub fn resolve_attack(attacker: &mut Unit, defender: &mut Unit) -> AttackReport {
    let damage = attack_damage(attacker.atk, defender.def);
    defender.apply_damage(damage);
    attacker.attacked = true;

    AttackReport {
        attacker: attacker.id,
        defender: defender.id,
        damage,
        defender_hp: defender.hp,
        defeated: !defender.is_alive(),
    }
}
