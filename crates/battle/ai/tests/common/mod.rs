//! Shared fixtures for battle-ai integration tests.
#![allow(dead_code)]

use std::cell::Cell;
use std::collections::BTreeMap;

use battle_core::{
    BattleAttackInfo, BattleHex, BattleInfo, BattleSide, BattleStack, Bonus, BonusType,
    CreatureProfile, DamageEstimate, DamageOracle, DamageRange, Distances, ReachabilityOracle,
    StackId, Unit, UnitInfo,
};

/// Installs a test subscriber once; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// ============================================================================
// Stacks
// ============================================================================

/// Ten creatures of 10 HP each.
pub fn melee(id: u32, side: BattleSide, x: i16, y: i16) -> BattleStack {
    BattleStack::new(
        StackId(id),
        side,
        CreatureProfile::new(0, 1, 10),
        10,
        BattleHex::from_xy(x, y),
    )
}

/// Ten shooters of 10 HP each with twelve shots.
pub fn archer(id: u32, side: BattleSide, x: i16, y: i16) -> BattleStack {
    BattleStack::new(
        StackId(id),
        side,
        CreatureProfile::new(2, 2, 10),
        10,
        BattleHex::from_xy(x, y),
    )
    .with_bonuses([
        Bonus::new(BonusType::Shooter, 0),
        Bonus::new(BonusType::Shots, 12),
    ])
}

pub fn ability(ty: BonusType) -> Bonus {
    Bonus::new(ty, 0)
}

// ============================================================================
// Damage oracle
// ============================================================================

/// Returns the same estimate for every blow, optionally per attacker/defender
/// pair.
pub struct FixedDamage {
    default: DamageEstimate,
    per_pair: BTreeMap<(StackId, StackId), DamageEstimate>,
    calls: Cell<usize>,
}

impl FixedDamage {
    pub fn new(dealt: (i64, i64), retaliation: (i64, i64)) -> Self {
        Self {
            default: estimate(dealt, retaliation),
            per_pair: BTreeMap::new(),
            calls: Cell::new(0),
        }
    }

    pub fn with_pair(
        mut self,
        attacker: u32,
        defender: u32,
        dealt: (i64, i64),
        retaliation: (i64, i64),
    ) -> Self {
        self.per_pair.insert(
            (StackId(attacker), StackId(defender)),
            estimate(dealt, retaliation),
        );
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

fn estimate(dealt: (i64, i64), retaliation: (i64, i64)) -> DamageEstimate {
    DamageEstimate {
        dealt: DamageRange::new(dealt.0, dealt.1),
        retaliation: DamageRange::new(retaliation.0, retaliation.1),
    }
}

impl DamageOracle for FixedDamage {
    fn estimate_damage(&self, attack: &BattleAttackInfo<'_>) -> DamageEstimate {
        self.calls.set(self.calls.get() + 1);
        let key = (attack.attacker.unit_id(), attack.defender.unit_id());
        self.per_pair.get(&key).copied().unwrap_or(self.default)
    }
}

// ============================================================================
// Reachability oracle
// ============================================================================

/// Obstacle-free movement: every free hex within `speed` steps is reachable.
pub struct GridReachability {
    pub speed: u32,
}

impl GridReachability {
    pub fn new(speed: u32) -> Self {
        Self { speed }
    }

    fn occupied_by_others(battle: &dyn BattleInfo, unit: &dyn Unit) -> Vec<BattleHex> {
        let id = unit.unit_id();
        battle
            .stacks_if(&|other| other.alive() && other.unit_id() != id)
            .into_iter()
            .flat_map(|other| {
                other
                    .position()
                    .footprint(other.unit_side(), other.double_wide())
            })
            .collect()
    }
}

fn all_hexes() -> impl Iterator<Item = BattleHex> {
    (0..BattleHex::FIELD_SIZE as i16).map(BattleHex)
}

impl ReachabilityOracle for GridReachability {
    fn distances(&self, battle: &dyn BattleInfo, unit: &dyn Unit, from: BattleHex) -> Distances {
        let mut distances = Distances::unreachable();
        for hex in self.available_hexes(battle, unit, from) {
            distances.set(hex, from.distance(hex));
        }
        distances
    }

    fn available_hexes(
        &self,
        battle: &dyn BattleInfo,
        unit: &dyn Unit,
        from: BattleHex,
    ) -> Vec<BattleHex> {
        let occupied = Self::occupied_by_others(battle, unit);
        all_hexes()
            .filter(|hex| hex.is_available())
            .filter(|hex| from.distance(*hex) <= self.speed)
            .filter(|hex| !occupied.contains(hex))
            .collect()
    }

    fn nearest_stack(
        &self,
        battle: &dyn BattleInfo,
        unit: &dyn Unit,
    ) -> Option<(StackId, BattleHex)> {
        let from = unit.position();
        let id = unit.unit_id();
        let reachable = self.available_hexes(battle, unit, from);

        let mut others = battle.stacks_if(&|other| other.alive() && other.unit_id() != id);
        others.sort_by_key(|other| from.distance(other.position()));

        others.into_iter().find_map(|target| {
            reachable
                .iter()
                .copied()
                .filter(|hex| hex.is_adjacent(target.position()))
                .min_by_key(|hex| from.distance(*hex))
                .map(|hex| (target.unit_id(), hex))
        })
    }
}
