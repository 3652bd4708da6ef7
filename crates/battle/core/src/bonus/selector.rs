//! Composable bonus predicates.

use std::fmt;
use std::sync::Arc;

use super::{Bonus, BonusDuration, BonusSource, BonusType, EffectRange};

/// Predicate over [`Bonus`] records, combinable with [`Selector::and`] and
/// [`Selector::or`].
#[derive(Clone)]
pub struct Selector(Arc<dyn Fn(&Bonus) -> bool + Send + Sync>);

impl Selector {
    /// Wraps an arbitrary predicate.
    pub fn new(predicate: impl Fn(&Bonus) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(predicate))
    }

    /// Matches every bonus.
    pub fn all() -> Self {
        Self::new(|_| true)
    }

    pub fn of_type(ty: BonusType) -> Self {
        Self::new(move |bonus| bonus.ty == ty)
    }

    pub fn type_subtype(ty: BonusType, subtype: i32) -> Self {
        Self::new(move |bonus| bonus.ty == ty && bonus.subtype == subtype)
    }

    pub fn source(source: BonusSource, source_id: i32) -> Self {
        Self::new(move |bonus| bonus.source == source && bonus.source_id == source_id)
    }

    pub fn effect_range(range: EffectRange) -> Self {
        Self::new(move |bonus| bonus.effect_range == range)
    }

    /// Bonuses still active `turn` turns from now.
    pub fn turns(turn: i32) -> Self {
        Self::new(move |bonus| {
            !bonus.duration.contains(BonusDuration::N_TURNS) || bonus.turns_remain > turn
        })
    }

    pub fn and(self, other: Selector) -> Self {
        Self::new(move |bonus| self.matches(bonus) && other.matches(bonus))
    }

    pub fn or(self, other: Selector) -> Self {
        Self::new(move |bonus| self.matches(bonus) || other.matches(bonus))
    }

    pub fn matches(&self, bonus: &Bonus) -> bool {
        (self.0)(bonus)
    }
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Selector(..)")
    }
}
