//! Per-stack combat state.
//!
//! [`StackCombatState`] is a plain value: it owns its ledgers and flags and
//! only *borrows* the owning stack when a ledger needs to consult abilities.
//! Simulations copy it, mutate the copy and throw it away; the authoritative
//! battle is never touched.

mod ammo;
mod health;
mod info;

pub use ammo::{
    AmmoLedger, AmmoPolicy, Casts, CastsPolicy, RetaliationPolicy, Retaliations, Shots,
    ShotsPolicy,
};
pub use health::{HealLevel, HealPower, HealthData, HealthLedger};
pub use info::{StackStateData, StackStateInfo};

use bitflags::bitflags;

use crate::bonus::{BonusBearer, BonusType, Selector};
use crate::error::{BattleError, ErrorSeverity};
use crate::hex::BattleHex;
use crate::unit::{StackId, UnitBonus};

bitflags! {
    /// Boolean facts about a stack.
    ///
    /// Flags marked "per round" are cleared by [`StackCombatState::end_round`].
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct StackFlags: u16 {
        /// Stack is a magical copy of another stack.
        const CLONED         = 1 << 0;
        /// Per round.
        const DEFENDING      = 1 << 1;
        const DEFENDING_ANIM = 1 << 2;
        /// Per round.
        const DRAINED_MANA   = 1 << 3;
        /// Per round.
        const FEAR           = 1 << 4;
        /// Per round.
        const HAD_MORALE     = 1 << 5;
        /// Removed from battle; kept only in this round's data.
        const GHOST          = 1 << 6;
        /// Becomes a ghost at the next round boundary.
        const GHOST_PENDING  = 1 << 7;
        /// Per round.
        const MOVED          = 1 << 8;
        /// Created by a summoning effect.
        const SUMMONED       = 1 << 9;
        /// Per round.
        const WAITING        = 1 << 10;
    }
}

impl StackFlags {
    /// Flags reset at every round boundary.
    pub const ROUND: Self = Self::DEFENDING
        .union(Self::DEFENDING_ANIM)
        .union(Self::DRAINED_MANA)
        .union(Self::FEAR)
        .union(Self::HAD_MORALE)
        .union(Self::MOVED)
        .union(Self::WAITING);
}

/// Errors raised while reading or writing stack state.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error("stack {0} is not part of the battle")]
    UnknownStack(StackId),

    #[error("state for stack {found} cannot be applied to stack {expected}")]
    StackMismatch { expected: StackId, found: StackId },

    #[error("failed to encode stack state: {0}")]
    Encode(String),

    #[error("failed to decode stack state: {0}")]
    Decode(String),
}

impl BattleError for StateError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownStack(_) | Self::StackMismatch { .. } => ErrorSeverity::Validation,
            Self::Encode(_) | Self::Decode(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownStack(_) => "STATE_UNKNOWN_STACK",
            Self::StackMismatch { .. } => "STATE_STACK_MISMATCH",
            Self::Encode(_) => "STATE_ENCODE",
            Self::Decode(_) => "STATE_DECODE",
        }
    }
}

/// Mutable combat state of one stack.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StackCombatState {
    pub health: HealthLedger,
    pub shots: Shots,
    pub casts: Casts,
    pub retaliations: Retaliations,
    pub flags: StackFlags,
    /// Live clone created from this stack, if any.
    pub clone_id: Option<StackId>,
    pub position: BattleHex,
}

impl StackCombatState {
    /// Fresh state at full health, off the field.
    pub fn new(unit_max_health: i32, base_amount: i32) -> Self {
        Self {
            health: HealthLedger::full(unit_max_health, base_amount),
            shots: Shots::default(),
            casts: Casts::default(),
            retaliations: Retaliations::default(),
            flags: StackFlags::empty(),
            clone_id: None,
            position: BattleHex::INVALID,
        }
    }

    pub fn at(mut self, position: BattleHex) -> Self {
        self.position = position;
        self
    }

    pub fn with_flags(mut self, flags: StackFlags) -> Self {
        self.flags |= flags;
        self
    }

    // ------------------------------------------------------------------
    // Health
    // ------------------------------------------------------------------

    pub fn alive(&self) -> bool {
        self.health.available() > 0
    }

    pub fn is_ghost(&self) -> bool {
        self.flags.contains(StackFlags::GHOST)
    }

    pub fn is_clone(&self) -> bool {
        self.flags.contains(StackFlags::CLONED)
    }

    pub fn has_clone(&self) -> bool {
        self.clone_id.is_some()
    }

    pub fn is_summoned(&self) -> bool {
        self.flags.contains(StackFlags::SUMMONED)
    }

    pub fn count(&self) -> i32 {
        self.health.count()
    }

    pub fn first_hp_left(&self) -> i32 {
        self.health.first_hp_left()
    }

    pub fn available_health(&self) -> i64 {
        self.health.available()
    }

    pub fn total_health(&self) -> i64 {
        self.health.total()
    }

    /// Creatures lost so far, not counting temporary resurrections.
    pub fn killed(&self) -> i32 {
        (self.health.base_amount() - self.health.count() + self.health.resurrected()).max(0)
    }

    /// Applies damage and returns the amount actually taken.
    ///
    /// A clone dies from any positive damage (reported as 1). Clones and
    /// summoned stacks are marked to become ghosts once empty.
    pub fn damage(&mut self, amount: i64) -> i64 {
        let applied = if self.is_clone() {
            if amount > 0 {
                self.health.reset();
                1
            } else {
                0
            }
        } else {
            self.health.damage(amount)
        };

        if self.health.available() <= 0 && (self.is_clone() || self.is_summoned()) {
            self.flags.insert(StackFlags::GHOST_PENDING);
        }
        applied
    }

    /// Heals within the limits of `level`; returns the amount applied.
    pub fn heal(&mut self, amount: i64, level: HealLevel, power: HealPower) -> i64 {
        if level == HealLevel::Heal && power == HealPower::OneBattle {
            tracing::warn!(amount, "heal for one battle does not make sense, ignored");
            0
        } else if self.is_clone() {
            tracing::warn!(amount, "attempt to heal a clone, ignored");
            0
        } else {
            self.health.heal(amount, level, power)
        }
    }

    // ------------------------------------------------------------------
    // Ability-dependent queries
    // ------------------------------------------------------------------

    pub fn can_shoot(&self, owner: &(impl UnitBonus + ?Sized)) -> bool {
        self.shots.can_use(owner, 1) && owner.has_bonus_of_type(BonusType::Shooter)
    }

    pub fn is_shooter(&self, owner: &(impl UnitBonus + ?Sized)) -> bool {
        self.shots.total(owner) > 0 && owner.has_bonus_of_type(BonusType::Shooter)
    }

    pub fn can_cast(&self, owner: &(impl UnitBonus + ?Sized)) -> bool {
        self.casts.can_use(owner, 1)
    }

    pub fn is_caster(&self, owner: &(impl UnitBonus + ?Sized)) -> bool {
        self.casts.total(owner) > 0
    }

    pub fn able_to_retaliate(&self, owner: &(impl UnitBonus + ?Sized)) -> bool {
        self.alive()
            && self.retaliations.can_use(owner, 1)
            && !owner.has_bonus_of_type(BonusType::SiegeWeapon)
            && !owner.has_bonus_of_type(BonusType::Hypnotized)
            && !owner.has_bonus_of_type(BonusType::NoRetaliation)
    }

    /// Returns true if the stack can act `turn` turns from now.
    pub fn can_move(&self, owner: &(impl UnitBonus + ?Sized), turn: i32) -> bool {
        self.alive()
            && !owner.has_bonus(&Selector::of_type(BonusType::NotActive).and(Selector::turns(turn)))
    }

    /// Whether the stack already moved; only known for the current turn.
    pub fn moved(&self, turn: i32) -> bool {
        turn == 0 && self.flags.contains(StackFlags::MOVED)
    }

    /// Whether the stack already waited; only known for the current turn.
    pub fn waited(&self, turn: i32) -> bool {
        turn == 0 && self.flags.contains(StackFlags::WAITING)
    }

    pub fn will_move(&self, owner: &(impl UnitBonus + ?Sized), turn: i32) -> bool {
        (turn != 0 || !self.flags.contains(StackFlags::DEFENDING))
            && !self.moved(turn)
            && self.can_move(owner, turn)
    }

    // ------------------------------------------------------------------
    // Round lifecycle
    // ------------------------------------------------------------------

    /// Round boundary bookkeeping.
    ///
    /// Clears per-round flags, restores retaliations, removes creatures that
    /// were only resurrected for one battle round and turns pending ghosts
    /// into ghosts.
    pub fn end_round(&mut self) {
        self.flags.remove(StackFlags::ROUND);
        self.retaliations.reset();
        self.health.take_resurrected();

        if self.flags.contains(StackFlags::GHOST_PENDING) {
            self.flags.remove(StackFlags::GHOST_PENDING);
            self.flags.insert(StackFlags::GHOST);
        }
    }
}
