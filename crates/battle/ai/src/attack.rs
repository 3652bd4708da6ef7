//! Simulation and scoring of a single attack.

use battle_core::{
    BattleAttackInfo, BattleHex, BonusBearer, BonusType, DamageOracle, EffectRange, Selector,
    Unit, UnitInfo,
};

use crate::priorities::Priorities;

/// One candidate attack together with its simulated outcome.
///
/// `attack` holds the engagement after the simulated exchange: both working
/// states reflect every blow that was struck.
#[derive(Clone, Debug)]
pub struct AttackPossibility<'a> {
    /// Hex the attacker strikes from; invalid for ranged attacks.
    pub tile: BattleHex,
    pub attack: BattleAttackInfo<'a>,
    pub damage_dealt: i64,
    /// Usually taken from retaliation.
    pub damage_received: i64,
    /// Positional bonus during the tactics phase.
    pub tactic_impact: i64,
}

impl<'a> AttackPossibility<'a> {
    /// Simulates the full exchange described by `info` from `tile`.
    ///
    /// Every blow asks the oracle for a fresh estimate against the current
    /// working states, clamps it to what is left to kill and applies the
    /// midpoint. The outcome carries the numbers of the last blow only.
    pub fn evaluate(info: BattleAttackInfo<'a>, tile: BattleHex, oracle: &dyn DamageOracle) -> Self {
        let remaining_retaliations = info
            .defender_state
            .retaliations
            .available(info.defender);
        let retaliation_blocked = info.attacker.has_bonus_of_type(BonusType::BlocksRetaliation)
            || info.defender.has_bonus_of_type(BonusType::NoRetaliation);

        let total_attacks = 1 + info.attacker.total_value(&additional_attacks());

        let mut possibility = Self {
            tile,
            attack: info,
            damage_dealt: 0,
            damage_received: 0,
            tactic_impact: 0,
        };

        for blow in 0..total_attacks {
            let current = &mut possibility.attack;
            let estimate = oracle.estimate_damage(current);

            let dealt = estimate
                .dealt
                .clamp_to(current.defender_state.available_health());
            let retaliation = estimate
                .retaliation
                .clamp_to(current.attacker_state.available_health());

            possibility.damage_dealt = dealt.midpoint();
            possibility.damage_received = retaliation.midpoint();

            if remaining_retaliations <= blow || retaliation_blocked {
                possibility.damage_received = 0;
            }

            current.attacker_state.damage(possibility.damage_received);
            current.defender_state.damage(possibility.damage_dealt);

            if !current.attacker_state.alive() || !current.defender_state.alive() {
                break;
            }
        }

        tracing::trace!(
            attacker = %possibility.attack.attacker.unit_id(),
            defender = %possibility.attack.defender.unit_id(),
            tile = %tile,
            dealt = possibility.damage_dealt,
            received = possibility.damage_received,
            "attack evaluated"
        );
        possibility
    }

    pub fn with_tactic_impact(mut self, tactic_impact: i64) -> Self {
        self.tactic_impact = tactic_impact;
        self
    }

    /// The stack being attacked.
    pub fn enemy(&self) -> &'a dyn Unit {
        self.attack.defender
    }

    /// Weighted damage balance from the attacker's controller's view.
    ///
    /// Hitting a stack of the same nominal side counts every point as a
    /// loss. A mind-controlled attacker fights for the other side, so the
    /// result is negated.
    pub fn damage_diff(&self, priorities: &Priorities) -> i64 {
        let attacker = self.attack.attacker;
        let defender = self.attack.defender;

        let dealt = priorities.stack_value(defender) * self.damage_dealt as f64;
        let received = priorities.stack_value(attacker) * self.damage_received as f64;

        let mut diff = if attacker.unit_side() == defender.unit_side() {
            (-dealt - received) as i64
        } else {
            (dealt - received) as i64
        };

        if attacker.effective_side() != attacker.unit_side() {
            diff = -diff;
        }
        diff
    }

    pub fn attack_value(&self, priorities: &Priorities) -> i64 {
        self.damage_diff(priorities) + self.tactic_impact
    }
}

/// Extra blows usable in melee: unrestricted or melee-only.
fn additional_attacks() -> Selector {
    Selector::of_type(BonusType::AdditionalAttack).and(
        Selector::effect_range(EffectRange::NoLimit)
            .or(Selector::effect_range(EffectRange::OnlyMeleeFight)),
    )
}
