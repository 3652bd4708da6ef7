//! Per-stack weighting of damage values.

use std::fmt;

use battle_core::Unit;

/// Scoring knobs for attack evaluation.
///
/// `stack_evaluator` weights a point of damage against a given stack. The
/// default weights every stack at 1.0, which turns attack values into plain
/// hit-point accounting.
pub struct Priorities {
    stack_evaluator: Box<dyn Fn(&dyn Unit) -> f64 + Send + Sync>,
}

impl Priorities {
    pub fn new(stack_evaluator: impl Fn(&dyn Unit) -> f64 + Send + Sync + 'static) -> Self {
        Self {
            stack_evaluator: Box::new(stack_evaluator),
        }
    }

    pub fn stack_value(&self, unit: &dyn Unit) -> f64 {
        (self.stack_evaluator)(unit)
    }
}

impl Default for Priorities {
    fn default() -> Self {
        Self::new(|_| 1.0)
    }
}

impl fmt::Debug for Priorities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Priorities").finish_non_exhaustive()
    }
}
