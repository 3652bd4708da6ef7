//! Health ledger of a stack.
//!
//! Hit points are stored as `(full_units, first_hp_left)`: the number of
//! untouched creatures behind the front one, and the remaining hit points of
//! the front creature. The creature's maximum hit points and the stack's
//! starting count are constants copied in at construction.
//!
//! Invariant: a non-empty stack always shows a positive front HP
//! (`count() > 0 ⟹ first_hp_left() > 0`).

/// How far a heal may go.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HealLevel {
    /// Top off the front creature only; never resurrects.
    Heal,
    /// Restore up to the stack's starting health.
    Resurrect,
    /// Unbounded.
    Overheal,
}

/// Whether restored creatures survive the current round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HealPower {
    /// Restored creatures are removed again at the round boundary.
    OneBattle,
    Permanent,
}

/// Mutable part of the health ledger, as carried by the transfer form.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HealthData {
    pub first_hp_left: i32,
    pub full_units: i32,
    pub resurrected: i32,
}

/// Hit-point bookkeeping for one stack.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HealthLedger {
    unit_max_health: i32,
    base_amount: i32,
    first_hp_left: i32,
    full_units: i32,
    resurrected: i32,
}

impl HealthLedger {
    /// Creates an empty ledger; call [`HealthLedger::init`] to fill it.
    pub fn new(unit_max_health: i32, base_amount: i32) -> Self {
        Self {
            unit_max_health: unit_max_health.max(1),
            base_amount: base_amount.max(0),
            first_hp_left: 0,
            full_units: 0,
            resurrected: 0,
        }
    }

    /// Creates a ledger at full starting health.
    pub fn full(unit_max_health: i32, base_amount: i32) -> Self {
        let mut ledger = Self::new(unit_max_health, base_amount);
        ledger.init();
        ledger
    }

    /// Fills the ledger with the stack's starting health.
    pub fn init(&mut self) {
        self.reset();
        self.full_units = if self.base_amount > 1 {
            self.base_amount - 1
        } else {
            0
        };
        self.first_hp_left = if self.base_amount > 0 {
            self.unit_max_health
        } else {
            0
        };
    }

    /// Zeroes the ledger.
    pub fn reset(&mut self) {
        self.first_hp_left = 0;
        self.full_units = 0;
        self.resurrected = 0;
    }

    pub fn unit_max_health(&self) -> i32 {
        self.unit_max_health
    }

    pub fn base_amount(&self) -> i32 {
        self.base_amount
    }

    /// Number of living creatures, front one included.
    pub fn count(&self) -> i32 {
        self.full_units + i32::from(self.first_hp_left > 0)
    }

    pub fn first_hp_left(&self) -> i32 {
        self.first_hp_left
    }

    pub fn full_units(&self) -> i32 {
        self.full_units
    }

    /// Creatures restored by temporary healing this round.
    pub fn resurrected(&self) -> i32 {
        self.resurrected
    }

    /// Remaining hit points of the whole stack.
    pub fn available(&self) -> i64 {
        i64::from(self.first_hp_left) + i64::from(self.unit_max_health) * i64::from(self.full_units)
    }

    /// Starting hit points of the whole stack.
    pub fn total(&self) -> i64 {
        i64::from(self.unit_max_health) * i64::from(self.base_amount)
    }

    /// Removes `amount` hit points; returns the amount actually applied.
    ///
    /// Damage beyond the available health is clamped, never an error.
    pub fn damage(&mut self, amount: i64) -> i64 {
        let amount = amount.max(0);
        let old_count = self.count();

        let applied = if amount >= i64::from(self.first_hp_left) {
            let available = self.available();
            let applied = amount.min(available);
            let remaining = available - applied;
            if remaining <= 0 {
                self.full_units = 0;
                self.first_hp_left = 0;
            } else {
                self.set_from_total(remaining);
            }
            applied
        } else {
            self.first_hp_left -= amount as i32;
            amount
        };

        self.add_resurrected(self.count() - old_count);
        applied
    }

    /// Restores up to `amount` hit points within the cap set by `level`.
    ///
    /// Returns the amount actually applied; zero-amount heals are no-ops.
    pub fn heal(&mut self, amount: i64, level: HealLevel, power: HealPower) -> i64 {
        let old_count = self.count();

        let max_heal = match level {
            HealLevel::Heal => i64::from(self.unit_max_health - self.first_hp_left),
            HealLevel::Resurrect => self.total() - self.available(),
            HealLevel::Overheal => i64::from(i32::MAX),
        }
        .max(0);

        let amount = amount.clamp(0, max_heal);
        if amount == 0 {
            return 0;
        }

        let before = self.available();
        self.set_from_total(before + amount);

        if power == HealPower::OneBattle {
            self.add_resurrected(self.count() - old_count);
        }
        self.available() - before
    }

    /// Removes creatures restored by temporary healing.
    pub fn take_resurrected(&mut self) {
        if self.resurrected != 0 {
            let remaining = self.available()
                - i64::from(self.resurrected) * i64::from(self.unit_max_health);
            self.set_from_total(remaining.max(0));
            self.resurrected = 0;
        }
    }

    pub fn data(&self) -> HealthData {
        HealthData {
            first_hp_left: self.first_hp_left,
            full_units: self.full_units,
            resurrected: self.resurrected,
        }
    }

    /// Overwrites the mutable portion from a transfer form.
    pub fn set_data(&mut self, data: HealthData) {
        self.first_hp_left = data.first_hp_left.max(0);
        self.full_units = data.full_units.max(0);
        self.resurrected = data.resurrected.max(0);
    }

    fn add_resurrected(&mut self, delta: i32) {
        self.resurrected = (self.resurrected + delta).max(0);
    }

    /// Splits `total` into full units and the front unit. The creature count
    /// saturates at `i32::MAX`.
    fn set_from_total(&mut self, total: i64) {
        let unit = i64::from(self.unit_max_health);
        let total = total.clamp(0, i64::from(i32::MAX) * unit);
        self.first_hp_left = (total % unit) as i32;
        self.full_units = (total / unit) as i32;

        if self.first_hp_left == 0 && self.full_units >= 1 {
            self.first_hp_left = self.unit_max_health;
            self.full_units -= 1;
        }
    }
}
