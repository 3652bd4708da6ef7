//! Read-side capability of anything that carries bonuses.

use super::{BonusList, BonusType, Selector};

/// Answers "does this entity have ability X, and with what magnitude".
///
/// Implementors only provide [`BonusBearer::bonuses`]; every other query is
/// derived from it. Both live battle stacks and hypothetical shadow stacks
/// implement this trait, so ledger totals and combat rules see the same
/// (possibly overlaid) ability set.
pub trait BonusBearer {
    /// All bonuses matching `selector`.
    fn bonuses(&self, selector: &Selector) -> BonusList;

    fn has_bonus(&self, selector: &Selector) -> bool {
        !self.bonuses(selector).is_empty()
    }

    fn has_bonus_of_type(&self, ty: BonusType) -> bool {
        self.has_bonus(&Selector::of_type(ty))
    }

    fn has_bonus_of_subtype(&self, ty: BonusType, subtype: i32) -> bool {
        self.has_bonus(&Selector::type_subtype(ty, subtype))
    }

    /// Aggregated value of the bonuses matching `selector`.
    fn total_value(&self, selector: &Selector) -> i32 {
        self.bonuses(selector).total_value()
    }

    fn value_of_bonuses(&self, ty: BonusType) -> i32 {
        self.total_value(&Selector::of_type(ty))
    }
}

impl BonusBearer for BonusList {
    fn bonuses(&self, selector: &Selector) -> BonusList {
        self.filtered(selector)
    }
}
