//! Turn-queue evaluation and spellcast selection.
//!
//! The planner scores a battle position by walking the turn queue and
//! letting every stack make its best attack against an overlay. Spellcasts
//! are scored by how much that walk improves once the spell's effects are
//! applied to a fresh overlay.

mod spellcast;

pub use spellcast::{PossibleSpellcast, SpellEffectOnStack, SpellEffects};

use std::collections::BTreeMap;

use battle_core::{
    BattleEnv, BattleError, BattleInfo, ErrorSeverity, OracleError, StackId, StateError, Unit,
    UnitInfo,
};

use crate::config::PlannerConfig;
use crate::hypothetic::HypotheticBattle;
use crate::priorities::Priorities;
use crate::targets::{PotentialTargets, TargetError};

/// Best-action value of each stack, from the planner's side.
pub type ValueMap = BTreeMap<StackId, i64>;

/// Errors raised by the planner.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    /// Spell target parts are empty, or mix untargeted and hex parts.
    #[error("malformed spell target: {0}")]
    MalformedSpellTarget(String),

    #[error(transparent)]
    Target(#[from] TargetError),

    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl BattleError for PlanError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::MalformedSpellTarget(_) => ErrorSeverity::Validation,
            Self::Target(err) => err.severity(),
            Self::State(err) => err.severity(),
            Self::Oracle(err) => err.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MalformedSpellTarget(_) => "PLAN_MALFORMED_SPELL_TARGET",
            Self::Target(err) => err.error_code(),
            Self::State(err) => err.error_code(),
            Self::Oracle(err) => err.error_code(),
        }
    }
}

/// Battle planner for one side.
pub struct Planner<'e> {
    config: PlannerConfig,
    env: BattleEnv<'e>,
    priorities: Priorities,
}

impl<'e> Planner<'e> {
    pub fn new(config: PlannerConfig, env: BattleEnv<'e>) -> Self {
        Self {
            config,
            env,
            priorities: Priorities::default(),
        }
    }

    pub fn with_priorities(mut self, priorities: Priorities) -> Self {
        self.priorities = priorities;
        self
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn priorities(&self) -> &Priorities {
        &self.priorities
    }

    /// Walks `queue`, letting each stack make its best attack in `overlay`.
    ///
    /// The walk stops at the first stack already present in `values`, so a
    /// queue spanning more than one round is evaluated once. After each
    /// attack the attacker's and defender's post-attack states are written
    /// to the overlay; the attacker moves only when it attacked from a hex.
    /// Dead stacks are valued 0. Unknown stacks are logged and skipped.
    pub fn evaluate_queue(
        &self,
        overlay: &mut HypotheticBattle<'_>,
        queue: &[StackId],
        values: &mut ValueMap,
    ) -> Result<(), PlanError> {
        for &stack_id in queue {
            if values.contains_key(&stack_id) {
                break;
            }

            // stacks killed earlier in the walk have nothing left to do
            if overlay.stack(stack_id).is_some_and(|unit| !unit.alive()) {
                values.insert(stack_id, 0);
                continue;
            }

            let (mut value, best) = {
                let targets = match PotentialTargets::new(&*overlay, stack_id, &self.env) {
                    Ok(targets) => targets,
                    Err(TargetError::UnknownStack(id)) => {
                        tracing::warn!(stack = %id, "queued stack is not in the battle, skipping");
                        continue;
                    }
                    Err(err) => {
                        tracing::error!(
                            stack = %stack_id,
                            severity = %err.severity(),
                            code = err.error_code(),
                            "queue evaluation failed: {err}"
                        );
                        return Err(err.into());
                    }
                };

                let best = if targets.is_empty() {
                    None
                } else {
                    let action = targets.best_action(&self.priorities)?;
                    Some((
                        action.attack.attacker_state.clone(),
                        action.tile,
                        action.enemy().unit_id(),
                        action.attack.defender_state.clone(),
                    ))
                };
                (targets.best_action_value(&self.priorities), best)
            };

            if let Some((attacker_state, tile, defender_id, defender_state)) = best {
                let attacker = overlay.get_for_update(stack_id)?;
                attacker.state = attacker_state;
                if tile.is_valid() {
                    attacker.state.position = tile;
                }
                overlay.get_for_update(defender_id)?.state = defender_state;
            }

            // best action is valued from the effective owner's view
            let owner = overlay
                .stack(stack_id)
                .map(|unit| unit.effective_side())
                .ok_or(StateError::UnknownStack(stack_id))?;
            if owner != self.config.side {
                value = -value;
            }

            tracing::trace!(stack = %stack_id, value, "queue entry evaluated");
            values.insert(stack_id, value);
        }
        Ok(())
    }

    /// Values of `queue` in the untouched battle.
    pub fn baseline(&self, real: &dyn BattleInfo, queue: &[StackId]) -> Result<ValueMap, PlanError> {
        let mut overlay = HypotheticBattle::new(real);
        let mut values = ValueMap::new();
        self.evaluate_queue(&mut overlay, queue, &mut values)?;
        Ok(values)
    }
}
