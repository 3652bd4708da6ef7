//! Unit identity and the capability set every combat participant exposes.
//!
//! A unit is queried through three layered traits:
//!
//! - [`UnitInfo`]: static identity (id, side, creature profile, base amount)
//! - [`UnitBonus`]: ability lookup plus the ammo-cart query
//! - [`Unit`]: the above plus the current [`StackCombatState`]
//!
//! There are exactly two implementors: the authoritative
//! [`BattleStack`](crate::battle::BattleStack) and the hypothetical shadow
//! stack defined by the AI overlay.

use std::fmt;

use crate::bonus::{BonusBearer, BonusType};
use crate::hex::BattleHex;
use crate::state::StackCombatState;

/// Unique identifier of a stack within one battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StackId(pub u32);

impl fmt::Display for StackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Side of the battle a stack was deployed on.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum BattleSide {
    #[default]
    Attacker,
    Defender,
}

impl BattleSide {
    pub const fn other(self) -> Self {
        match self {
            Self::Attacker => Self::Defender,
            Self::Defender => Self::Attacker,
        }
    }
}

/// Static creature data a stack is built from.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreatureProfile {
    pub index: i32,
    pub level: i32,
    /// Hit points of a single creature.
    pub max_health: i32,
    pub double_wide: bool,
}

impl CreatureProfile {
    pub const CATAPULT: i32 = 145;
    pub const AMMO_CART: i32 = 148;
    pub const ARROW_TOWERS: i32 = 149;

    pub fn new(index: i32, level: i32, max_health: i32) -> Self {
        Self {
            index,
            level,
            max_health,
            double_wide: false,
        }
    }

    pub fn double_wide(mut self) -> Self {
        self.double_wide = true;
        self
    }
}

/// Static identity of a stack.
pub trait UnitInfo {
    fn unit_id(&self) -> StackId;

    /// Nominal side; see [`Unit::effective_side`] for the controlling side.
    fn unit_side(&self) -> BattleSide;

    fn creature(&self) -> &CreatureProfile;

    /// Creature count the stack entered the battle with.
    fn unit_base_amount(&self) -> i32;

    fn unit_max_health(&self) -> i32 {
        self.creature().max_health
    }

    fn double_wide(&self) -> bool {
        self.creature().double_wide
    }

    fn creature_index(&self) -> i32 {
        self.creature().index
    }
}

/// Ability lookup for a stack.
pub trait UnitBonus: BonusBearer {
    /// Returns true if a living ammo cart fights on this stack's side.
    fn has_ammo_cart(&self) -> bool;
}

/// A stack as seen by combat rules: identity, abilities and current state.
pub trait Unit: UnitInfo + UnitBonus {
    fn state(&self) -> &StackCombatState;

    fn position(&self) -> BattleHex {
        self.state().position
    }

    fn alive(&self) -> bool {
        self.state().alive()
    }

    fn is_ghost(&self) -> bool {
        self.state().is_ghost()
    }

    fn is_dead(&self) -> bool {
        !self.alive() && !self.is_ghost()
    }

    fn is_turret(&self) -> bool {
        self.creature_index() == CreatureProfile::ARROW_TOWERS
    }

    /// Non-turret, non-ghost stack standing on the field.
    fn is_valid_target(&self, allow_dead: bool) -> bool {
        (self.alive() || (allow_dead && self.is_dead()))
            && self.position().is_valid()
            && !self.is_turret()
    }

    /// Side actually controlling the stack (mind control flips it).
    fn effective_side(&self) -> BattleSide {
        if self.has_bonus_of_type(BonusType::Hypnotized) {
            self.unit_side().other()
        } else {
            self.unit_side()
        }
    }

    fn can_shoot(&self) -> bool {
        self.state().can_shoot(self)
    }

    fn is_shooter(&self) -> bool {
        self.state().is_shooter(self)
    }

    fn can_cast(&self) -> bool {
        self.state().can_cast(self)
    }

    fn able_to_retaliate(&self) -> bool {
        self.state().able_to_retaliate(self)
    }

    fn can_move(&self, turn: i32) -> bool {
        self.state().can_move(self, turn)
    }

    fn will_move(&self, turn: i32) -> bool {
        self.state().will_move(self, turn)
    }
}

/// Geometric melee contact test accounting for both footprints.
///
/// Checks front↔front, attacker back↔defender front, attacker
/// front↔defender back and back↔back adjacency with the attacker standing
/// on `attacker_pos` (its current position when invalid).
pub fn is_melee_attack_possible(
    attacker: &(impl Unit + ?Sized),
    defender: &(impl Unit + ?Sized),
    attacker_pos: BattleHex,
) -> bool {
    let attacker_pos = if attacker_pos.is_valid() {
        attacker_pos
    } else {
        attacker.position()
    };
    let defender_pos = defender.position();

    let attacker_hexes = attacker_pos.footprint(attacker.unit_side(), attacker.double_wide());
    let defender_hexes = defender_pos.footprint(defender.unit_side(), defender.double_wide());

    attacker_hexes
        .iter()
        .any(|a| defender_hexes.iter().any(|d| a.is_adjacent(*d)))
}
