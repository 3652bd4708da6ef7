//! Shadow stack: a hypothetical copy of one stack's state and abilities.

use std::fmt;

use battle_core::{
    Bonus, BonusBearer, BonusList, BonusSource, BattleSide, CreatureProfile, Selector,
    StackCombatState, StackId, Unit, UnitBonus, UnitInfo,
};

/// A stack as seen inside a [`HypotheticBattle`](super::HypotheticBattle).
///
/// Identity comes from the authoritative stack. The combat state is an
/// owned copy, and bonus queries return the authoritative result merged
/// with two delta lists:
///
/// - `bonuses_to_update`: timed effects that refresh an equivalent bonus if
///   one exists (remaining turns become the larger of the two), or are
///   appended otherwise
/// - `bonuses_to_add`: appended as-is
#[derive(Clone)]
pub struct StackWithBonuses<'a> {
    stack: &'a dyn Unit,
    pub state: StackCombatState,
    pub bonuses_to_add: Vec<Bonus>,
    pub bonuses_to_update: Vec<Bonus>,
}

impl<'a> StackWithBonuses<'a> {
    /// Shadows `stack` with a copy of its current state and no deltas.
    pub fn new(stack: &'a dyn Unit) -> Self {
        Self {
            stack,
            state: stack.state().clone(),
            bonuses_to_add: Vec::new(),
            bonuses_to_update: Vec::new(),
        }
    }

    /// The stack being shadowed.
    pub fn original(&self) -> &'a dyn Unit {
        self.stack
    }
}

/// Extends the remaining duration of every spell bonus refreshed by `effect`.
fn actualize_effect(target: &mut BonusList, effect: &Bonus) {
    for bonus in target.iter_mut() {
        if bonus.source == BonusSource::SpellEffect
            && bonus.ty == effect.ty
            && bonus.subtype == effect.subtype
        {
            bonus.turns_remain = bonus.turns_remain.max(effect.turns_remain);
        }
    }
}

impl BonusBearer for StackWithBonuses<'_> {
    fn bonuses(&self, selector: &Selector) -> BonusList {
        let mut merged = self.stack.bonuses(selector);

        for update in self.bonuses_to_update.iter().filter(|b| selector.matches(b)) {
            if merged.iter().any(|existing| existing.same_effect(update)) {
                actualize_effect(&mut merged, update);
            } else {
                merged.push(update.clone());
            }
        }

        merged.extend(
            self.bonuses_to_add
                .iter()
                .filter(|b| selector.matches(b))
                .cloned(),
        );
        merged
    }
}

impl UnitInfo for StackWithBonuses<'_> {
    fn unit_id(&self) -> StackId {
        self.stack.unit_id()
    }

    fn unit_side(&self) -> BattleSide {
        self.stack.unit_side()
    }

    fn creature(&self) -> &CreatureProfile {
        self.stack.creature()
    }

    fn unit_base_amount(&self) -> i32 {
        self.stack.unit_base_amount()
    }
}

impl UnitBonus for StackWithBonuses<'_> {
    fn has_ammo_cart(&self) -> bool {
        // TODO: re-check the cart against shadowed stacks once the overlay
        // can kill it
        self.stack.has_ammo_cart()
    }
}

impl Unit for StackWithBonuses<'_> {
    fn state(&self) -> &StackCombatState {
        &self.state
    }
}

impl fmt::Debug for StackWithBonuses<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StackWithBonuses")
            .field("stack", &self.stack.unit_id())
            .field("state", &self.state)
            .field("bonuses_to_add", &self.bonuses_to_add)
            .field("bonuses_to_update", &self.bonuses_to_update)
            .finish()
    }
}
