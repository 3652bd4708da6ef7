//! Oracle access errors.

use crate::error::{BattleError, ErrorSeverity};

/// Errors that occur when a required collaborator is missing.
///
/// Combat evaluation cannot proceed without damage estimates or
/// reachability data, so every variant is fatal.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleError {
    /// DamageOracle is not available in the environment.
    #[error("DamageOracle not available")]
    DamageNotAvailable,

    /// ReachabilityOracle is not available in the environment.
    #[error("ReachabilityOracle not available")]
    ReachabilityNotAvailable,
}

impl BattleError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::DamageNotAvailable => "ORACLE_DAMAGE_NOT_AVAILABLE",
            Self::ReachabilityNotAvailable => "ORACLE_REACHABILITY_NOT_AVAILABLE",
        }
    }
}
