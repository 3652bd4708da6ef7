//! Damage estimation contract.

use std::fmt;

use crate::state::StackCombatState;
use crate::unit::{Unit, UnitInfo};

/// Inclusive damage range reported by the damage oracle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DamageRange {
    pub low: i64,
    pub high: i64,
}

impl DamageRange {
    pub const ZERO: Self = Self { low: 0, high: 0 };

    pub const fn new(low: i64, high: i64) -> Self {
        Self { low, high }
    }

    /// Caps both ends at `limit`.
    pub fn clamp_to(self, limit: i64) -> Self {
        Self {
            low: self.low.min(limit),
            high: self.high.min(limit),
        }
    }

    /// Deterministic expectation of the range.
    pub fn midpoint(self) -> i64 {
        (self.low + self.high) / 2
    }
}

/// Estimated outcome of one blow: damage dealt and the retaliation it draws.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DamageEstimate {
    pub dealt: DamageRange,
    pub retaliation: DamageRange,
}

/// Engagement descriptor handed to the damage oracle.
///
/// Identity and abilities come from the unit references; health, ammo and
/// position come from the working states, which a simulation mutates blow
/// by blow.
#[derive(Clone)]
pub struct BattleAttackInfo<'a> {
    pub attacker: &'a dyn Unit,
    pub defender: &'a dyn Unit,
    pub attacker_state: StackCombatState,
    pub defender_state: StackCombatState,
    pub shooting: bool,
    /// Hexes travelled before a melee blow.
    pub charged_fields: u32,
    pub lucky_hit: bool,
    pub unlucky_hit: bool,
    pub death_blow: bool,
    pub ballista_double_damage: bool,
}

impl<'a> BattleAttackInfo<'a> {
    /// Describes `attacker` hitting `defender` in their current states.
    pub fn new(attacker: &'a dyn Unit, defender: &'a dyn Unit, shooting: bool) -> Self {
        Self {
            attacker,
            defender,
            attacker_state: attacker.state().clone(),
            defender_state: defender.state().clone(),
            shooting,
            charged_fields: 0,
            lucky_hit: false,
            unlucky_hit: false,
            death_blow: false,
            ballista_double_damage: false,
        }
    }

    /// The same engagement seen from the retaliating side.
    ///
    /// Retaliation is a plain melee blow: shooting and charge are cleared
    /// along with the lucky hit, death blow and double damage flags.
    pub fn reverse(&self) -> Self {
        Self {
            attacker: self.defender,
            defender: self.attacker,
            attacker_state: self.defender_state.clone(),
            defender_state: self.attacker_state.clone(),
            shooting: false,
            charged_fields: 0,
            lucky_hit: false,
            unlucky_hit: self.unlucky_hit,
            death_blow: false,
            ballista_double_damage: false,
        }
    }
}

impl fmt::Debug for BattleAttackInfo<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BattleAttackInfo")
            .field("attacker", &self.attacker.unit_id())
            .field("defender", &self.defender.unit_id())
            .field("attacker_state", &self.attacker_state)
            .field("defender_state", &self.defender_state)
            .field("shooting", &self.shooting)
            .field("charged_fields", &self.charged_fields)
            .finish_non_exhaustive()
    }
}

/// Damage calculation collaborator.
///
/// Ranges need not be clamped to either side's remaining health.
pub trait DamageOracle {
    fn estimate_damage(&self, attack: &BattleAttackInfo<'_>) -> DamageEstimate;
}
