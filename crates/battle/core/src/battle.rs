//! Read access to a battle and the authoritative battle container.
//!
//! [`BattleInfo`] is the seam between real and hypothetical views: rules such
//! as ownership matching and ranged legality are written once as provided
//! methods and work unchanged over an overlay.

use crate::bonus::{BonusBearer, BonusList, BonusType, Selector};
use crate::hex::BattleHex;
use crate::state::{HealLevel, HealPower, StackCombatState, StackStateInfo, StateError};
use crate::unit::{BattleSide, CreatureProfile, StackId, Unit, UnitBonus, UnitInfo};

/// Read-only view of the stacks taking part in a battle.
pub trait BattleInfo {
    /// Looks up a stack by id, ghosts included.
    fn stack(&self, id: StackId) -> Option<&dyn Unit>;

    /// Non-ghost stacks accepted by `predicate`, in deployment order.
    fn stacks_if(&self, predicate: &dyn Fn(&dyn Unit) -> bool) -> Vec<&dyn Unit>;

    fn stacks(&self) -> Vec<&dyn Unit> {
        self.stacks_if(&|_| true)
    }

    /// Ownership test used for targeting.
    ///
    /// `positive` selects friends (`Some(true)`), enemies (`Some(false)`) or
    /// anyone (`None`). A mind-controlled defender matches both sides.
    fn battle_match_owner(
        &self,
        attacker: &dyn Unit,
        defender: &dyn Unit,
        positive: Option<bool>,
    ) -> bool {
        let Some(positive) = positive else {
            return true;
        };

        if attacker.unit_id() == defender.unit_id() {
            return positive;
        }
        if defender.effective_side() != defender.unit_side() {
            return true;
        }
        (attacker.effective_side() == defender.effective_side()) == positive
    }

    /// Returns true if a living enemy stands next to `unit`.
    ///
    /// Sides are compared by controller, so a mind-controlled neighbour
    /// blocks its former allies. Siege weapons are never blocked.
    fn is_stack_blocked(&self, unit: &dyn Unit) -> bool {
        if unit.has_bonus_of_type(BonusType::SiegeWeapon) {
            return false;
        }

        let own = unit
            .position()
            .footprint(unit.unit_side(), unit.double_wide());
        let id = unit.unit_id();
        let side = unit.effective_side();

        !self
            .stacks_if(&|other| {
                other.alive()
                    && other.unit_id() != id
                    && other.effective_side() != side
                    && other
                        .position()
                        .footprint(other.unit_side(), other.double_wide())
                        .iter()
                        .any(|hex| own.iter().any(|mine| mine.is_adjacent(*hex)))
            })
            .is_empty()
    }

    /// Returns true if `attacker` may shoot at `target` right now.
    fn battle_can_shoot(&self, attacker: &dyn Unit, target: &dyn Unit) -> bool {
        if attacker.creature_index() == CreatureProfile::CATAPULT {
            // walls only
            return false;
        }
        if !attacker.can_shoot() || !target.alive() {
            return false;
        }
        if !self.battle_match_owner(attacker, target, Some(false)) {
            return false;
        }
        !self.is_stack_blocked(attacker) || attacker.has_bonus_of_type(BonusType::FreeShooting)
    }
}

// ============================================================================
// Authoritative battle
// ============================================================================

/// A stack as held by the authoritative battle.
#[derive(Clone, Debug)]
pub struct BattleStack {
    id: StackId,
    side: BattleSide,
    creature: CreatureProfile,
    base_amount: i32,
    bonuses: BonusList,
    ammo_cart: bool,
    state: StackCombatState,
}

impl BattleStack {
    pub fn new(
        id: StackId,
        side: BattleSide,
        creature: CreatureProfile,
        base_amount: i32,
        position: BattleHex,
    ) -> Self {
        let state = StackCombatState::new(creature.max_health, base_amount).at(position);
        Self {
            id,
            side,
            creature,
            base_amount,
            bonuses: BonusList::new(),
            ammo_cart: false,
            state,
        }
    }

    pub fn with_bonuses(mut self, bonuses: impl IntoIterator<Item = crate::bonus::Bonus>) -> Self {
        self.bonuses.extend(bonuses);
        self
    }

    pub fn bonus_list(&self) -> &BonusList {
        &self.bonuses
    }

    pub fn state_mut(&mut self) -> &mut StackCombatState {
        &mut self.state
    }
}

impl UnitInfo for BattleStack {
    fn unit_id(&self) -> StackId {
        self.id
    }

    fn unit_side(&self) -> BattleSide {
        self.side
    }

    fn creature(&self) -> &CreatureProfile {
        &self.creature
    }

    fn unit_base_amount(&self) -> i32 {
        self.base_amount
    }
}

impl BonusBearer for BattleStack {
    fn bonuses(&self, selector: &Selector) -> BonusList {
        self.bonuses.filtered(selector)
    }
}

impl UnitBonus for BattleStack {
    fn has_ammo_cart(&self) -> bool {
        self.ammo_cart
    }
}

impl Unit for BattleStack {
    fn state(&self) -> &StackCombatState {
        &self.state
    }
}

/// The authoritative battle: owns every stack and applies real outcomes.
#[derive(Clone, Debug, Default)]
pub struct Battle {
    stacks: Vec<BattleStack>,
    round: u32,
}

impl Battle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    /// Adds a stack; a stack with the same id is replaced.
    pub fn add_stack(&mut self, stack: BattleStack) {
        if let Some(existing) = self.stacks.iter_mut().find(|s| s.id == stack.id) {
            tracing::warn!(stack = %stack.id, "replacing existing stack");
            *existing = stack;
        } else {
            self.stacks.push(stack);
        }
        self.refresh_ammo_carts();
    }

    pub fn stack_mut(&mut self, id: StackId) -> Result<&mut BattleStack, StateError> {
        self.stacks
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(StateError::UnknownStack(id))
    }

    /// Applies real damage to a stack; returns the amount taken.
    pub fn damage_stack(&mut self, id: StackId, amount: i64) -> Result<i64, StateError> {
        let applied = self.stack_mut(id)?.state.damage(amount);
        tracing::debug!(stack = %id, amount, applied, "stack damaged");
        self.refresh_ammo_carts();
        Ok(applied)
    }

    /// Heals a stack; returns the amount restored.
    pub fn heal_stack(
        &mut self,
        id: StackId,
        amount: i64,
        level: HealLevel,
        power: HealPower,
    ) -> Result<i64, StateError> {
        let applied = self.stack_mut(id)?.state.heal(amount, level, power);
        tracing::debug!(stack = %id, amount, applied, %level, %power, "stack healed");
        self.refresh_ammo_carts();
        Ok(applied)
    }

    /// Overwrites a stack's mutable state with a transfer form.
    pub fn apply_state(&mut self, info: &StackStateInfo) -> Result<(), StateError> {
        let id = info.stack_id;
        self.stack_mut(id)?.state.apply_info(id, info)?;
        self.refresh_ammo_carts();
        Ok(())
    }

    /// Runs round-boundary bookkeeping on every stack.
    pub fn end_round(&mut self) {
        for stack in &mut self.stacks {
            stack.state.end_round();
        }
        self.round += 1;
        self.refresh_ammo_carts();
        tracing::debug!(round = self.round, "round ended");
    }

    fn refresh_ammo_carts(&mut self) {
        let carts = [BattleSide::Attacker, BattleSide::Defender].map(|side| {
            self.stacks.iter().any(|s| {
                s.side == side
                    && s.creature.index == CreatureProfile::AMMO_CART
                    && s.state.alive()
                    && !s.state.is_ghost()
            })
        });

        for stack in &mut self.stacks {
            stack.ammo_cart = match stack.side {
                BattleSide::Attacker => carts[0],
                BattleSide::Defender => carts[1],
            };
        }
    }
}

impl BattleInfo for Battle {
    fn stack(&self, id: StackId) -> Option<&dyn Unit> {
        self.stacks
            .iter()
            .find(|s| s.id == id)
            .map(|s| s as &dyn Unit)
    }

    fn stacks_if(&self, predicate: &dyn Fn(&dyn Unit) -> bool) -> Vec<&dyn Unit> {
        self.stacks
            .iter()
            .map(|s| s as &dyn Unit)
            .filter(|unit| !unit.is_ghost() && predicate(*unit))
            .collect()
    }
}
