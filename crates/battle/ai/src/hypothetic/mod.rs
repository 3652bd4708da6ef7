//! Copy-on-write view of a battle for speculative evaluation.
//!
//! A [`HypotheticBattle`] layers shadow stacks over an authoritative
//! [`BattleInfo`]. Reads for a stack that was never written fall through to
//! the real battle; once written, every read of that stack returns the
//! shadow. Nothing is ever written back: dropping the overlay discards all
//! hypothetical effects.

mod shadow;

pub use shadow::StackWithBonuses;

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use battle_core::{BattleInfo, StackId, StackStateInfo, StateError, Unit, UnitInfo};

/// Speculative battle state keyed by stack id.
pub struct HypotheticBattle<'a> {
    real: &'a dyn BattleInfo,
    stack_states: BTreeMap<StackId, StackWithBonuses<'a>>,
}

impl<'a> HypotheticBattle<'a> {
    pub fn new(real: &'a dyn BattleInfo) -> Self {
        Self {
            real,
            stack_states: BTreeMap::new(),
        }
    }

    /// The authoritative battle underneath.
    pub fn real(&self) -> &'a dyn BattleInfo {
        self.real
    }

    /// Shadow of `id`, created from the authoritative stack on first use.
    pub fn get_for_update(&mut self, id: StackId) -> Result<&mut StackWithBonuses<'a>, StateError> {
        let real = self.real;
        match self.stack_states.entry(id) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let stack = real.stack(id).ok_or(StateError::UnknownStack(id))?;
                Ok(entry.insert(StackWithBonuses::new(stack)))
            }
        }
    }

    /// Overwrites the shadow's mutable state with a transfer form.
    pub fn update_unit(&mut self, info: &StackStateInfo) -> Result<(), StateError> {
        let id = info.stack_id;
        self.get_for_update(id)?.state.apply_info(id, info)
    }

    pub fn shadow(&self, id: StackId) -> Option<&StackWithBonuses<'a>> {
        self.stack_states.get(&id)
    }

    /// Returns true if `id` has been written in this overlay.
    pub fn is_shadowed(&self, id: StackId) -> bool {
        self.stack_states.contains_key(&id)
    }

    pub fn shadowed_stacks(&self) -> impl Iterator<Item = StackId> + '_ {
        self.stack_states.keys().copied()
    }
}

impl BattleInfo for HypotheticBattle<'_> {
    fn stack(&self, id: StackId) -> Option<&dyn Unit> {
        match self.stack_states.get(&id) {
            Some(shadow) => Some(shadow as &dyn Unit),
            None => self.real.stack(id),
        }
    }

    fn stacks_if(&self, predicate: &dyn Fn(&dyn Unit) -> bool) -> Vec<&dyn Unit> {
        self.real
            .stacks_if(&|_| true)
            .into_iter()
            .map(|unit| match self.stack_states.get(&unit.unit_id()) {
                Some(shadow) => shadow as &dyn Unit,
                None => unit,
            })
            .filter(|unit| !unit.is_ghost() && predicate(*unit))
            .collect()
    }
}
