//! Common error infrastructure for battle-core.
//!
//! Domain-specific errors (e.g. [`StateError`](crate::state::StateError),
//! [`OracleError`](crate::oracle::OracleError)) live next to the code that
//! produces them and implement [`BattleError`] for uniform classification.
//!
//! Three kinds of failure exist in the combat core:
//!
//! - **Precondition violations** (planner bugs) are returned as `Err` values.
//! - **Soft data anomalies** (ammo overuse, mismatched transfer forms,
//!   contradictory heal requests) are clamped and logged, never returned.
//! - **Collaborator-reported problems** (illegal spell targets) are collected
//!   in a [`Problem`] report consumed by the AI or UI layer.

use std::fmt;

/// Severity level of an error, used to decide whether a caller can carry on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ErrorSeverity {
    /// Invalid input, e.g. an unknown stack id or a transfer form for the
    /// wrong stack.
    Validation,

    /// Inconsistent state or a planner bug, e.g. a best action requested
    /// from an empty option set.
    Internal,

    /// A required collaborator is missing.
    Fatal,
}

/// Common trait for all battle errors.
///
/// # Implementation Guidelines
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
/// - Return a stable `SCREAMING_CASE` code from [`BattleError::error_code`]
pub trait BattleError: fmt::Display + fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

// ============================================================================
// Problem reports
// ============================================================================

/// Severity of a collaborator-reported problem.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProblemSeverity {
    /// Informational; never blocks anything on its own.
    Lowest,
    /// Ordinary problem, e.g. one of several targets is immune.
    Normal,
    /// The requested action cannot be performed at all.
    Critical,
}

/// Structured report of problems found by an external rules engine.
///
/// A problem is never thrown: the spellcasting pipeline (or any other
/// collaborator) fills a report and the AI/UI layer decides what to do.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Problem {
    entries: Vec<(ProblemSeverity, String)>,
}

impl Problem {
    /// Creates an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a report holding a single critical entry.
    pub fn critical(description: impl Into<String>) -> Self {
        let mut problem = Self::new();
        problem.add(description, ProblemSeverity::Critical);
        problem
    }

    /// Appends a problem description.
    pub fn add(&mut self, description: impl Into<String>, severity: ProblemSeverity) {
        self.entries.push((severity, description.into()));
    }

    /// Returns true if nothing was reported.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if at least one entry is critical.
    pub fn is_critical(&self) -> bool {
        self.entries
            .iter()
            .any(|(severity, _)| *severity == ProblemSeverity::Critical)
    }

    /// Highest severity in the report, if any.
    pub fn max_severity(&self) -> Option<ProblemSeverity> {
        self.entries.iter().map(|(severity, _)| *severity).max()
    }

    /// Human-readable descriptions in insertion order.
    pub fn descriptions(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, text)| text.as_str())
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for text in self.descriptions() {
            if !first {
                f.write_str("; ")?;
            }
            f.write_str(text)?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_displays_in_snake_case() {
        assert_eq!(ErrorSeverity::Validation.to_string(), "validation");
        assert_eq!(ErrorSeverity::Fatal.to_string(), "fatal");
    }

    #[test]
    fn problem_tracks_highest_severity() {
        let mut problem = Problem::new();
        assert!(problem.is_empty());
        assert_eq!(problem.max_severity(), None);

        problem.add("target is immune", ProblemSeverity::Normal);
        assert!(!problem.is_critical());

        problem.add("no legal target", ProblemSeverity::Critical);
        assert!(problem.is_critical());
        assert_eq!(problem.max_severity(), Some(ProblemSeverity::Critical));
        assert_eq!(problem.to_string(), "target is immune; no legal target");
    }
}
