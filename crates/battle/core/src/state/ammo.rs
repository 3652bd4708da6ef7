//! Consumable charges: shots, spell casts and retaliations.
//!
//! Every ledger stores only the amount used. The capacity and whether the
//! capacity is enforced at all are asked from the owning stack's abilities on
//! every query, so an ability gained or lost mid-battle is picked up
//! immediately.

use std::cell::Cell;

use crate::bonus::{BonusBearer, BonusType};
use crate::unit::UnitBonus;

/// Capacity rules of one ledger kind.
pub trait AmmoPolicy {
    /// Capacity granted by the owner's abilities.
    fn total(&self, owner: &(impl UnitBonus + ?Sized)) -> i32;

    /// Returns false when charges are never exhausted.
    fn is_limited(&self, owner: &(impl UnitBonus + ?Sized)) -> bool;

    /// Clears any per-round memory the policy keeps.
    fn reset(&mut self) {}
}

/// Ranged shots; an allied ammo cart makes them unlimited.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ShotsPolicy;

impl AmmoPolicy for ShotsPolicy {
    fn total(&self, owner: &(impl UnitBonus + ?Sized)) -> i32 {
        owner.value_of_bonuses(BonusType::Shots)
    }

    fn is_limited(&self, owner: &(impl UnitBonus + ?Sized)) -> bool {
        !owner.has_ammo_cart()
    }
}

/// Spell casts; always limited.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CastsPolicy;

impl AmmoPolicy for CastsPolicy {
    fn total(&self, owner: &(impl UnitBonus + ?Sized)) -> i32 {
        owner.value_of_bonuses(BonusType::Casts)
    }

    fn is_limited(&self, _owner: &(impl UnitBonus + ?Sized)) -> bool {
        true
    }
}

/// Retaliation charges.
///
/// The capacity is one plus any additional retaliations, and never shrinks
/// within a round: the largest value observed is cached until [`reset`].
/// Removing an extra-retaliation ability mid-round (dispel) therefore does
/// not take back charges the stack already had.
///
/// [`reset`]: AmmoPolicy::reset
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RetaliationPolicy {
    cached_total: Cell<i32>,
}

impl RetaliationPolicy {
    pub fn cached_total(&self) -> i32 {
        self.cached_total.get()
    }

    pub(crate) fn set_cached_total(&self, total: i32) {
        self.cached_total.set(total.max(0));
    }
}

impl AmmoPolicy for RetaliationPolicy {
    fn total(&self, owner: &(impl UnitBonus + ?Sized)) -> i32 {
        let computed = 1 + owner.value_of_bonuses(BonusType::AdditionalRetaliation);
        let total = self.cached_total.get().max(computed);
        self.cached_total.set(total);
        total
    }

    fn is_limited(&self, owner: &(impl UnitBonus + ?Sized)) -> bool {
        !owner.has_bonus_of_type(BonusType::UnlimitedRetaliations)
    }

    fn reset(&mut self) {
        self.cached_total.set(0);
    }
}

/// Used-count ledger parameterised by its capacity rules.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AmmoLedger<P> {
    used: i32,
    policy: P,
}

pub type Shots = AmmoLedger<ShotsPolicy>;
pub type Casts = AmmoLedger<CastsPolicy>;
pub type Retaliations = AmmoLedger<RetaliationPolicy>;

impl<P: AmmoPolicy> AmmoLedger<P> {
    pub fn new(policy: P) -> Self {
        Self { used: 0, policy }
    }

    pub fn used(&self) -> i32 {
        self.used
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn total(&self, owner: &(impl UnitBonus + ?Sized)) -> i32 {
        self.policy.total(owner)
    }

    pub fn is_limited(&self, owner: &(impl UnitBonus + ?Sized)) -> bool {
        self.policy.is_limited(owner)
    }

    /// Remaining charges. Meaningless when the ledger is unlimited.
    pub fn available(&self, owner: &(impl UnitBonus + ?Sized)) -> i32 {
        self.total(owner) - self.used
    }

    pub fn can_use(&self, owner: &(impl UnitBonus + ?Sized), amount: i32) -> bool {
        !self.is_limited(owner) || self.available(owner) - amount >= 0
    }

    /// Consumes `amount` charges.
    ///
    /// Overuse is capped at the remaining charges and logged; unlimited
    /// ledgers never count usage.
    pub fn use_ammo(&mut self, owner: &(impl UnitBonus + ?Sized), amount: i32) {
        if !self.is_limited(owner) {
            return;
        }

        let available = self.available(owner);
        if available - amount < 0 {
            tracing::error!(
                used = self.used,
                requested = amount,
                available,
                "ammo overuse, consuming only what is left"
            );
            self.used += available.max(0);
        } else {
            self.used += amount.max(0);
        }
    }

    /// Forgets usage and any cached capacity.
    pub fn reset(&mut self) {
        self.used = 0;
        self.policy.reset();
    }

    pub(crate) fn set_used(&mut self, used: i32) {
        self.used = used.max(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bonus::{Bonus, BonusList, Selector};

    #[derive(Default)]
    struct Owner {
        bonuses: BonusList,
        ammo_cart: bool,
    }

    impl Owner {
        fn with(mut self, ty: BonusType, value: i32) -> Self {
            self.bonuses.push(Bonus::new(ty, value));
            self
        }
    }

    impl BonusBearer for Owner {
        fn bonuses(&self, selector: &Selector) -> BonusList {
            self.bonuses.filtered(selector)
        }
    }

    impl UnitBonus for Owner {
        fn has_ammo_cart(&self) -> bool {
            self.ammo_cart
        }
    }

    #[test]
    fn shots_are_capped_on_overuse() {
        let owner = Owner::default().with(BonusType::Shots, 3);
        let mut shots = Shots::default();

        shots.use_ammo(&owner, 2);
        assert_eq!(shots.available(&owner), 1);
        assert!(shots.can_use(&owner, 1));
        assert!(!shots.can_use(&owner, 2));

        shots.use_ammo(&owner, 5);
        assert_eq!(shots.used(), 3);
        assert_eq!(shots.available(&owner), 0);
    }

    #[test]
    fn ammo_cart_makes_shots_unlimited() {
        let mut owner = Owner::default().with(BonusType::Shots, 1);
        owner.ammo_cart = true;
        let mut shots = Shots::default();

        shots.use_ammo(&owner, 10);
        assert_eq!(shots.used(), 0);
        assert!(shots.can_use(&owner, 100));
    }

    #[test]
    fn casts_are_always_limited() {
        let mut owner = Owner::default();
        owner.ammo_cart = true;
        let casts = Casts::default();
        assert!(casts.is_limited(&owner));
        assert!(!casts.can_use(&owner, 1));
    }

    #[test]
    fn retaliation_total_never_shrinks_within_round() {
        let boosted = Owner::default().with(BonusType::AdditionalRetaliation, 2);
        let dispelled = Owner::default();
        let mut retaliations = Retaliations::default();

        assert_eq!(retaliations.total(&boosted), 3);
        assert_eq!(retaliations.total(&dispelled), 3);

        retaliations.use_ammo(&dispelled, 1);
        assert_eq!(retaliations.available(&dispelled), 2);

        retaliations.reset();
        assert_eq!(retaliations.total(&dispelled), 1);
        assert_eq!(retaliations.used(), 0);
    }

    #[test]
    fn unlimited_retaliations_ignore_usage() {
        let owner = Owner::default().with(BonusType::UnlimitedRetaliations, 0);
        let mut retaliations = Retaliations::default();
        retaliations.use_ammo(&owner, 4);
        assert!(retaliations.can_use(&owner, 1));
        assert_eq!(retaliations.used(), 0);
    }
}
