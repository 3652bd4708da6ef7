mod common;

use std::collections::BTreeMap;
use std::f64::consts::PI;

use battle_ai::{
    HypotheticBattle, PlanError, PlannerConfig, Planner, PossibleSpellcast, SpellEffectOnStack,
    SpellEffects, ValueMap,
};
use battle_core::{
    Battle, BattleEnv, BattleHex, BattleInfo, BattleSide, Bonus, BonusType, Problem, StackId,
    Unit,
};

use common::{FixedDamage, GridReachability, melee};

const KILL: i32 = 1;
const WOUND: i32 = 2;
const FRIENDLY: i32 = 3;
const SILENCE: i32 = 4;
const UNSUPPORTED: i32 = 5;
const NOTHING: i32 = 6;
const ILLEGAL: i32 = 7;

/// Canned spell effects keyed by spell id.
struct Spellbook {
    effects: BTreeMap<i32, Result<Vec<SpellEffectOnStack>, Problem>>,
}

impl Spellbook {
    fn standard() -> Self {
        let mut effects = BTreeMap::new();
        effects.insert(
            KILL,
            Ok(vec![SpellEffectOnStack::Damage {
                stack: StackId(2),
                amount: 100,
            }]),
        );
        effects.insert(
            WOUND,
            Ok(vec![SpellEffectOnStack::Damage {
                stack: StackId(2),
                amount: 30,
            }]),
        );
        effects.insert(
            FRIENDLY,
            Ok(vec![SpellEffectOnStack::Damage {
                stack: StackId(1),
                amount: 5,
            }]),
        );
        effects.insert(
            SILENCE,
            Ok(vec![SpellEffectOnStack::Timed {
                stack: StackId(2),
                bonuses_to_update: Vec::new(),
                bonuses_to_add: vec![Bonus::spell_effect(BonusType::NoRetaliation, 0, SILENCE, 2)],
            }]),
        );
        effects.insert(
            UNSUPPORTED,
            Ok(vec![SpellEffectOnStack::Other { stack: StackId(2) }]),
        );
        effects.insert(NOTHING, Ok(Vec::new()));
        effects.insert(ILLEGAL, Err(Problem::critical("target is immune")));
        Self { effects }
    }
}

impl SpellEffects for Spellbook {
    fn effects(
        &self,
        _battle: &dyn BattleInfo,
        cast: &PossibleSpellcast,
    ) -> Result<Vec<SpellEffectOnStack>, Problem> {
        self.effects
            .get(&cast.spell_id)
            .cloned()
            .unwrap_or_else(|| Err(Problem::critical("unknown spell")))
    }
}

fn duel() -> Battle {
    let mut battle = Battle::new();
    battle.add_stack(melee(1, BattleSide::Attacker, 5, 5));
    battle.add_stack(melee(2, BattleSide::Defender, 6, 5));
    battle
}

const QUEUE: [StackId; 3] = [StackId(1), StackId(2), StackId(1)];

struct Fixture {
    damage: FixedDamage,
    reach: GridReachability,
}

impl Fixture {
    fn new() -> Self {
        Self {
            damage: FixedDamage::new((10, 10), (4, 4)),
            reach: GridReachability::new(3),
        }
    }

    fn planner(&self, config: PlannerConfig) -> Planner<'_> {
        Planner::new(config, BattleEnv::from_oracles(&self.damage, &self.reach))
    }
}

fn values(pairs: &[(u32, i64)]) -> ValueMap {
    pairs.iter().map(|&(id, v)| (StackId(id), v)).collect()
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

// ============================================================================
// Queue evaluation
// ============================================================================

#[test]
fn queue_is_valued_from_planner_side() {
    common::init_tracing();
    let real = duel();
    let fixture = Fixture::new();

    let planner = fixture.planner(PlannerConfig::for_side(BattleSide::Attacker));
    assert_eq!(planner.baseline(&real, &QUEUE).unwrap(), values(&[(1, 6), (2, -6)]));

    let planner = fixture.planner(PlannerConfig::for_side(BattleSide::Defender));
    assert_eq!(planner.baseline(&real, &QUEUE).unwrap(), values(&[(1, -6), (2, 6)]));
}

#[test]
fn queue_walk_writes_post_attack_states() {
    let real = duel();
    let fixture = Fixture::new();
    let planner = fixture.planner(PlannerConfig::default());

    let mut overlay = HypotheticBattle::new(&real);
    let mut values = ValueMap::new();
    planner
        .evaluate_queue(&mut overlay, &QUEUE, &mut values)
        .unwrap();

    // each stack hit once and took one retaliation
    let first = overlay.stack(StackId(1)).unwrap();
    let second = overlay.stack(StackId(2)).unwrap();
    assert_eq!(first.state().available_health(), 86);
    assert_eq!(second.state().available_health(), 86);
    assert!(first.position().is_adjacent(second.position()));

    assert_eq!(real.stack(StackId(1)).unwrap().state().available_health(), 100);
    assert_eq!(real.stack(StackId(2)).unwrap().state().available_health(), 100);
}

#[test]
fn queue_walk_skips_unknown_and_dead_stacks() {
    let mut real = duel();
    real.add_stack(melee(3, BattleSide::Defender, 14, 8));
    real.damage_stack(StackId(3), 1_000).unwrap();

    let fixture = Fixture::new();
    let planner = fixture.planner(PlannerConfig::default());

    let queue = [StackId(9), StackId(3), StackId(1), StackId(2)];
    assert_eq!(
        planner.baseline(&real, &queue).unwrap(),
        values(&[(1, 6), (2, -6), (3, 0)])
    );
}

#[test]
fn missing_oracle_fails_queue_walk() {
    let real = duel();
    let planner = Planner::new(PlannerConfig::default(), BattleEnv::empty());
    assert!(matches!(
        planner.baseline(&real, &QUEUE),
        Err(PlanError::Target(_))
    ));
}

// ============================================================================
// Spellcast evaluation
// ============================================================================

fn evaluate(cast: PossibleSpellcast) -> Result<f64, PlanError> {
    let real = duel();
    let fixture = Fixture::new();
    let planner = fixture.planner(PlannerConfig::default());
    let baseline = planner.baseline(&real, &QUEUE)?;
    planner.evaluate_spellcast(&real, &QUEUE, &baseline, &cast, &Spellbook::standard())
}

#[test]
fn killing_spell_scores_damage_tie_breaker() {
    // the attacker loses its target and the defender its attack: gains cancel
    let value = evaluate(PossibleSpellcast::new(KILL, BattleHex::from_xy(6, 5))).unwrap();
    assert_close(value, 100f64.atan() / PI);
}

#[test]
fn wounding_spell_without_queue_change() {
    let value = evaluate(PossibleSpellcast::new(WOUND, BattleHex::from_xy(6, 5))).unwrap();
    assert_close(value, 30f64.atan() / PI);
}

#[test]
fn friendly_damage_is_rejected() {
    let value = evaluate(PossibleSpellcast::new(FRIENDLY, BattleHex::from_xy(5, 5))).unwrap();
    assert_close(value, -1.0);
}

#[test]
fn timed_effect_changes_queue_values() {
    // no retaliation: stack 1 now trades 10 for 0 instead of 10 for 4
    let value = evaluate(PossibleSpellcast::new(SILENCE, BattleHex::from_xy(6, 5))).unwrap();
    assert_close(value, 4.0);
}

#[test]
fn unusable_casts_score_minus_one() {
    for spell in [UNSUPPORTED, NOTHING, ILLEGAL] {
        let value = evaluate(PossibleSpellcast::untargeted(spell)).unwrap();
        assert_close(value, -1.0);
    }
}

#[test]
fn malformed_target_list_is_an_error() {
    let err = evaluate(PossibleSpellcast::with_targets(KILL, vec![])).unwrap_err();
    assert!(matches!(err, PlanError::MalformedSpellTarget(_)));

    let err = evaluate(PossibleSpellcast::with_targets(
        KILL,
        vec![BattleHex::INVALID, BattleHex::from_xy(6, 5)],
    ))
    .unwrap_err();
    assert!(matches!(err, PlanError::MalformedSpellTarget(_)));
}

// ============================================================================
// Spellcast choice
// ============================================================================

fn candidates() -> Vec<PossibleSpellcast> {
    vec![
        PossibleSpellcast::new(FRIENDLY, BattleHex::from_xy(5, 5)),
        PossibleSpellcast::new(WOUND, BattleHex::from_xy(6, 5)),
        PossibleSpellcast::new(KILL, BattleHex::from_xy(6, 5)),
    ]
}

#[test]
fn best_cast_is_chosen_and_all_values_filled() {
    let real = duel();
    let fixture = Fixture::new();
    let planner = fixture.planner(PlannerConfig::default());

    let mut casts = candidates();
    let chosen = planner
        .choose_spellcast(&real, &QUEUE, &mut casts, &Spellbook::standard())
        .unwrap()
        .unwrap();

    assert_eq!(chosen.spell_id, KILL);
    assert_close(casts[0].value, -1.0);
    assert_close(casts[1].value, 30f64.atan() / PI);
    assert_close(casts[2].value, chosen.value);
}

#[test]
fn cast_below_threshold_is_not_chosen() {
    let real = duel();
    let fixture = Fixture::new();
    let config = PlannerConfig {
        minimum_cast_value: 0.9,
        ..PlannerConfig::default()
    };
    let planner = fixture.planner(config);

    let mut casts = candidates();
    let chosen = planner
        .choose_spellcast(&real, &QUEUE, &mut casts, &Spellbook::standard())
        .unwrap();
    assert!(chosen.is_none());
    assert!(casts[2].value > 0.0);
}

#[test]
fn equal_casts_prefer_first_candidate() {
    let real = duel();
    let fixture = Fixture::new();
    let planner = fixture.planner(PlannerConfig::default());

    let mut casts = vec![
        PossibleSpellcast::new(WOUND, BattleHex::from_xy(6, 5)),
        PossibleSpellcast::new(WOUND, BattleHex::from_xy(7, 5)),
    ];
    let chosen = planner
        .choose_spellcast(&real, &QUEUE, &mut casts, &Spellbook::standard())
        .unwrap()
        .unwrap();
    assert_eq!(chosen.targets, vec![BattleHex::from_xy(6, 5)]);
}

#[test]
fn no_candidates_means_no_cast() {
    let real = duel();
    let fixture = Fixture::new();
    let planner = fixture.planner(PlannerConfig::default());
    assert_eq!(
        planner
            .choose_spellcast(&real, &QUEUE, &mut [], &Spellbook::standard())
            .unwrap(),
        None
    );
}
