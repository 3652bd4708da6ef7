//! Enumeration of every attack one stack can make this turn.

use battle_core::{
    BattleAttackInfo, BattleEnv, BattleError, BattleHex, BattleInfo, BonusBearer, BonusType,
    ErrorSeverity, OracleError, StackId, Unit, UnitInfo, is_melee_attack_possible,
};

use crate::attack::AttackPossibility;
use crate::priorities::Priorities;

/// Errors raised while enumerating or ranking attacks.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TargetError {
    /// A best action was requested from an empty option set.
    #[error("no best action, since there are no actions")]
    NoActions,

    #[error("attacking stack {0} is not part of the battle")]
    UnknownStack(StackId),

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl BattleError for TargetError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NoActions => ErrorSeverity::Internal,
            Self::UnknownStack(_) => ErrorSeverity::Validation,
            Self::Oracle(err) => err.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NoActions => "TARGET_NO_ACTIONS",
            Self::UnknownStack(_) => "TARGET_UNKNOWN_STACK",
            Self::Oracle(err) => err.error_code(),
        }
    }
}

/// Reachable attacks and unreachable enemies of one acting stack.
#[derive(Clone, Debug)]
pub struct PotentialTargets<'a> {
    pub possible_attacks: Vec<AttackPossibility<'a>>,
    pub unreachable_enemies: Vec<StackId>,
}

impl<'a> PotentialTargets<'a> {
    /// Enumerates the attacks of `attacker_id` against `battle`.
    ///
    /// `battle` may be an overlay; positions, states and ownership are all
    /// read through it.
    ///
    /// # Errors
    ///
    /// Returns `TargetError::UnknownStack` if the attacker is not in the
    /// battle, or an oracle error if a required oracle is missing.
    pub fn new(
        battle: &'a dyn BattleInfo,
        attacker_id: StackId,
        env: &BattleEnv<'_>,
    ) -> Result<Self, TargetError> {
        let damage = env.damage()?;
        let reachability = env.reachability()?;

        let attacker = battle
            .stack(attacker_id)
            .ok_or(TargetError::UnknownStack(attacker_id))?;

        let dists = reachability.distances(battle, attacker, attacker.position());
        let available_hexes = reachability.available_hexes(battle, attacker, attacker.position());

        let forced = if attacker.has_bonus_of_type(BonusType::AttacksNearestCreature) {
            Some(reachability.nearest_stack(battle, attacker))
        } else {
            None
        };

        let mut targets = Self {
            possible_attacks: Vec::new(),
            unreachable_enemies: Vec::new(),
        };

        for defender in battle.stacks_if(&|unit| unit.alive()) {
            let defender_id = defender.unit_id();
            if defender_id == attacker_id {
                continue;
            }

            if forced.is_none() && !battle.battle_match_owner(attacker, defender, Some(false)) {
                continue;
            }

            let generate = |shooting: bool, hex: BattleHex| {
                let mut info = BattleAttackInfo::new(attacker, defender, shooting);
                if hex.is_valid() && !shooting {
                    info.charged_fields = dists.get(hex);
                }
                AttackPossibility::evaluate(info, hex, damage)
            };

            match forced {
                Some(Some((forced_id, forced_hex))) if forced_id == defender_id => {
                    targets.possible_attacks.push(generate(false, forced_hex));
                }
                Some(_) => targets.unreachable_enemies.push(defender_id),
                None if battle.battle_can_shoot(attacker, defender) => {
                    targets
                        .possible_attacks
                        .push(generate(true, BattleHex::INVALID));
                }
                None => {
                    let before = targets.possible_attacks.len();
                    for &hex in &available_hexes {
                        if is_melee_attack_possible(attacker, defender, hex) {
                            targets.possible_attacks.push(generate(false, hex));
                        }
                    }
                    if targets.possible_attacks.len() == before {
                        targets.unreachable_enemies.push(defender_id);
                    }
                }
            }
        }

        tracing::debug!(
            attacker = %attacker_id,
            attacks = targets.possible_attacks.len(),
            unreachable = targets.unreachable_enemies.len(),
            "targets enumerated"
        );
        Ok(targets)
    }

    pub fn is_empty(&self) -> bool {
        self.possible_attacks.is_empty()
    }

    /// Attack with the highest value; the first one wins ties.
    ///
    /// # Errors
    ///
    /// Returns `TargetError::NoActions` when there is nothing to attack.
    pub fn best_action(&self, priorities: &Priorities) -> Result<&AttackPossibility<'a>, TargetError> {
        let mut attacks = self.possible_attacks.iter();
        let first = attacks.next().ok_or(TargetError::NoActions)?;

        let (best, _) = attacks.fold(
            (first, first.attack_value(priorities)),
            |(best, best_value), candidate| {
                let value = candidate.attack_value(priorities);
                if value > best_value {
                    (candidate, value)
                } else {
                    (best, best_value)
                }
            },
        );
        Ok(best)
    }

    /// Value of the best attack, or 0 when there is none.
    pub fn best_action_value(&self, priorities: &Priorities) -> i64 {
        self.best_action(priorities)
            .map(|best| best.attack_value(priorities))
            .unwrap_or(0)
    }
}
