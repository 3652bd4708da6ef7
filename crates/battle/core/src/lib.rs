//! Authoritative combat model for stack-based tactical battles.
//!
//! `battle-core` owns the per-stack resource ledgers (health, shots, casts,
//! retaliations), the [`StackCombatState`] that groups them, hex geometry,
//! the bonus model and the [`BattleInfo`] read trait shared by the real
//! battle and hypothetical views built on top of it. Damage formulas and
//! pathfinding are external collaborators reached through [`oracle`].
pub mod battle;
pub mod bonus;
pub mod error;
pub mod hex;
pub mod oracle;
pub mod state;
pub mod unit;

pub use battle::{Battle, BattleInfo, BattleStack};
pub use bonus::{
    Bonus, BonusBearer, BonusDuration, BonusList, BonusSource, BonusType, BonusValueType,
    EffectRange, Selector,
};
pub use error::{BattleError, ErrorSeverity, Problem, ProblemSeverity};
pub use hex::{BattleHex, HexDirection};
pub use oracle::{
    BattleAttackInfo, BattleEnv, DamageEstimate, DamageOracle, DamageRange, Distances, Env,
    INFINITE_DISTANCE, OracleError, ReachabilityOracle,
};
pub use state::{
    HealLevel, HealPower, HealthLedger, StackCombatState, StackFlags, StackStateData,
    StackStateInfo, StateError,
};
pub use unit::{
    BattleSide, CreatureProfile, StackId, Unit, UnitBonus, UnitInfo, is_melee_attack_possible,
};
