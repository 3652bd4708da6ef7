//! Battle AI: attack simulation, target enumeration and spellcast planning.
//!
//! Everything here works on copies. [`AttackPossibility`] simulates an
//! exchange on working states, [`PotentialTargets`] enumerates the attacks
//! of one stack, and [`HypotheticBattle`] layers shadow stacks over the
//! authoritative battle so the [`Planner`] can ask "what if" without ever
//! mutating real state.
pub mod attack;
pub mod config;
pub mod hypothetic;
pub mod planner;
pub mod priorities;
pub mod targets;

pub use attack::AttackPossibility;
#[cfg(feature = "loaders")]
pub use config::ConfigLoader;
pub use config::PlannerConfig;
pub use hypothetic::{HypotheticBattle, StackWithBonuses};
pub use planner::{
    PlanError, Planner, PossibleSpellcast, SpellEffectOnStack, SpellEffects, ValueMap,
};
pub use priorities::Priorities;
pub use targets::{PotentialTargets, TargetError};
