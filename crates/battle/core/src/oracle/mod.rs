//! External collaborators consumed by combat evaluation.
//!
//! Oracles answer questions this crate does not own: damage formulas and
//! pathfinding. The [`BattleEnv`] aggregate bundles them so evaluators can
//! reach everything they need without hard coupling to concrete
//! implementations.

mod damage;
mod error;
mod reachability;

pub use damage::{BattleAttackInfo, DamageEstimate, DamageOracle, DamageRange};
pub use error::OracleError;
pub use reachability::{Distances, INFINITE_DISTANCE, ReachabilityOracle};

/// Aggregates the oracles required by attack simulation and targeting.
#[derive(Debug)]
pub struct Env<'a, D, R>
where
    D: DamageOracle + ?Sized,
    R: ReachabilityOracle + ?Sized,
{
    damage: Option<&'a D>,
    reachability: Option<&'a R>,
}

pub type BattleEnv<'a> = Env<'a, dyn DamageOracle + 'a, dyn ReachabilityOracle + 'a>;

impl<D, R> Clone for Env<'_, D, R>
where
    D: DamageOracle + ?Sized,
    R: ReachabilityOracle + ?Sized,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<D, R> Copy for Env<'_, D, R>
where
    D: DamageOracle + ?Sized,
    R: ReachabilityOracle + ?Sized,
{
}

impl<'a, D, R> Env<'a, D, R>
where
    D: DamageOracle + ?Sized,
    R: ReachabilityOracle + ?Sized,
{
    pub fn new(damage: Option<&'a D>, reachability: Option<&'a R>) -> Self {
        Self {
            damage,
            reachability,
        }
    }

    pub fn with_all(damage: &'a D, reachability: &'a R) -> Self {
        Self::new(Some(damage), Some(reachability))
    }

    pub fn empty() -> Self {
        Self::new(None, None)
    }

    /// Returns the DamageOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::DamageNotAvailable` if no damage oracle was provided.
    pub fn damage(&self) -> Result<&'a D, OracleError> {
        self.damage.ok_or(OracleError::DamageNotAvailable)
    }

    /// Returns the ReachabilityOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::ReachabilityNotAvailable` if no reachability
    /// oracle was provided.
    pub fn reachability(&self) -> Result<&'a R, OracleError> {
        self.reachability
            .ok_or(OracleError::ReachabilityNotAvailable)
    }
}

impl<'a> BattleEnv<'a> {
    /// Erases concrete oracle types.
    pub fn from_oracles(
        damage: &'a dyn DamageOracle,
        reachability: &'a dyn ReachabilityOracle,
    ) -> Self {
        Env::with_all(damage, reachability)
    }
}
