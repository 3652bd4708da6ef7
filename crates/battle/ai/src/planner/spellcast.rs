//! Spellcast scoring.

use std::collections::BTreeSet;
use std::f64::consts::PI;

use battle_core::{BattleHex, BattleInfo, Bonus, Problem, StackId, UnitInfo};

use super::{PlanError, Planner, ValueMap};
use crate::hypothetic::HypotheticBattle;

/// A spell and where to cast it.
#[derive(Clone, Debug, PartialEq)]
pub struct PossibleSpellcast {
    pub spell_id: i32,
    /// Destination parts. A single invalid hex marks an untargeted spell.
    pub targets: Vec<BattleHex>,
    /// Filled in by evaluation.
    pub value: f64,
}

impl PossibleSpellcast {
    pub fn new(spell_id: i32, target: BattleHex) -> Self {
        Self {
            spell_id,
            targets: vec![target],
            value: 0.0,
        }
    }

    pub fn untargeted(spell_id: i32) -> Self {
        Self::new(spell_id, BattleHex::INVALID)
    }

    pub fn with_targets(spell_id: i32, targets: Vec<BattleHex>) -> Self {
        Self {
            spell_id,
            targets,
            value: 0.0,
        }
    }

    /// Rejects empty part lists and lists mixing untargeted and hex parts.
    pub fn validate(&self) -> Result<(), PlanError> {
        if self.targets.is_empty() {
            return Err(PlanError::MalformedSpellTarget(format!(
                "spell {} has no target parts",
                self.spell_id
            )));
        }
        let untargeted = self.targets.iter().filter(|hex| !hex.is_valid()).count();
        if untargeted > 0 && self.targets.len() > 1 {
            return Err(PlanError::MalformedSpellTarget(format!(
                "spell {} mixes {} untargeted parts with hex targets",
                self.spell_id, untargeted
            )));
        }
        Ok(())
    }
}

/// What a spell would do to one stack.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpellEffectOnStack {
    /// Direct damage before friendly-fire weighting.
    Damage { stack: StackId, amount: i64 },
    /// Timed effect expressed as bonus deltas.
    Timed {
        stack: StackId,
        bonuses_to_update: Vec<Bonus>,
        bonuses_to_add: Vec<Bonus>,
    },
    /// An effect the planner cannot model.
    Other { stack: StackId },
}

/// Spellcasting pipeline collaborator.
pub trait SpellEffects {
    /// Effects of `cast` on every affected stack.
    ///
    /// Illegal casts are reported as a [`Problem`].
    fn effects(
        &self,
        battle: &dyn BattleInfo,
        cast: &PossibleSpellcast,
    ) -> Result<Vec<SpellEffectOnStack>, Problem>;
}

impl Planner<'_> {
    /// Scores a spellcast against the `baseline` values of `queue`.
    ///
    /// The result is the summed change of queue values after the cast, plus
    /// `atan(damage balance) / π` as a fractional tie-breaker. Casts that
    /// hurt own stacks more than enemies score -1, as do casts nobody is
    /// affected by, casts the planner cannot model and casts the pipeline
    /// reports a problem for.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::MalformedSpellTarget` for a malformed target
    /// list, or any error raised while re-evaluating the queue.
    pub fn evaluate_spellcast(
        &self,
        real: &dyn BattleInfo,
        queue: &[StackId],
        baseline: &ValueMap,
        cast: &PossibleSpellcast,
        spells: &dyn SpellEffects,
    ) -> Result<f64, PlanError> {
        cast.validate()?;

        let effects = match spells.effects(real, cast) {
            Ok(effects) => effects,
            Err(problem) => {
                tracing::warn!(spell = cast.spell_id, %problem, "spellcast rejected");
                return Ok(-1.0);
            }
        };
        if effects.is_empty() {
            return Ok(-1.0);
        }

        let mut overlay = HypotheticBattle::new(real);
        let mut damage_diff = 0i64;

        for effect in effects {
            match effect {
                SpellEffectOnStack::Damage { stack, amount } => {
                    let shadow = overlay.get_for_update(stack)?;
                    let friendly = shadow.unit_side() == self.config.side;
                    let amount = if friendly {
                        amount.saturating_mul(self.config.friendly_damage_multiplier)
                    } else {
                        amount
                    };

                    shadow.state.damage(amount);

                    // own stacks count as losses even while mind-controlled
                    if friendly {
                        damage_diff -= amount;
                    } else {
                        damage_diff += amount;
                    }
                }
                SpellEffectOnStack::Timed {
                    stack,
                    bonuses_to_update,
                    bonuses_to_add,
                } => {
                    let shadow = overlay.get_for_update(stack)?;
                    shadow.bonuses_to_update.extend(bonuses_to_update);
                    shadow.bonuses_to_add.extend(bonuses_to_add);
                }
                SpellEffectOnStack::Other { stack } => {
                    tracing::debug!(spell = cast.spell_id, stack = %stack, "unsupported spell effect");
                    return Ok(-1.0);
                }
            }
        }

        let mut values = ValueMap::new();
        self.evaluate_queue(&mut overlay, queue, &mut values)?;

        let stacks: BTreeSet<StackId> = baseline.keys().chain(values.keys()).copied().collect();
        let mut total_gain = 0i64;
        for id in stacks {
            let new_value = values.get(&id).copied().unwrap_or(0);
            let old_value = baseline.get(&id).copied().unwrap_or(0);
            let gain = new_value - old_value;
            if gain != 0 {
                tracing::trace!(
                    spell = cast.spell_id,
                    stack = %id,
                    gain,
                    old_value,
                    new_value,
                    "cast changes stack value"
                );
                total_gain += gain;
            }
        }

        tracing::debug!(spell = cast.spell_id, total_gain, damage_diff, "spellcast evaluated");

        if damage_diff < 0 {
            Ok(-1.0)
        } else {
            Ok(total_gain as f64 + (damage_diff as f64).atan() / PI)
        }
    }

    /// Picks the most valuable cast, if any is worth casting.
    ///
    /// Every candidate's `value` is filled in. The first of equally valued
    /// casts wins, and it is returned only when its value exceeds
    /// `minimum_cast_value`.
    pub fn choose_spellcast(
        &self,
        real: &dyn BattleInfo,
        queue: &[StackId],
        candidates: &mut [PossibleSpellcast],
        spells: &dyn SpellEffects,
    ) -> Result<Option<PossibleSpellcast>, PlanError> {
        if candidates.is_empty() {
            return Ok(None);
        }

        let baseline = self.baseline(real, queue)?;
        for cast in candidates.iter_mut() {
            cast.value = self.evaluate_spellcast(real, queue, &baseline, cast, spells)?;
        }

        let mut best = &candidates[0];
        for cast in &candidates[1..] {
            if cast.value > best.value {
                best = cast;
            }
        }

        if best.value > self.config.minimum_cast_value {
            tracing::debug!(spell = best.spell_id, value = best.value, "casting best spell");
            Ok(Some(best.clone()))
        } else {
            tracing::debug!(
                spell = best.spell_id,
                value = best.value,
                "best spell is not worth casting"
            );
            Ok(None)
        }
    }
}
