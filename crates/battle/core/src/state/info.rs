//! Compact transfer form of a stack's mutable state.
//!
//! Only the fields that change during battle travel: flags, ledger usage,
//! health and position. Constants (max HP, base amount, abilities) are
//! already known on both ends.

use super::{HealthData, StackCombatState, StackFlags, StateError};
use crate::hex::BattleHex;
use crate::unit::StackId;

/// Mutable portion of [`StackCombatState`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StackStateData {
    pub flags: StackFlags,
    pub clone_id: Option<StackId>,
    pub position: BattleHex,
    pub health: HealthData,
    pub shots_used: i32,
    pub casts_used: i32,
    pub retaliations_used: i32,
    pub retaliations_cached_total: i32,
}

/// Transfer form keyed by the stack it describes.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StackStateInfo {
    pub stack_id: StackId,
    pub data: StackStateData,
}

#[cfg(feature = "serde")]
impl StackStateInfo {
    pub fn encode(&self) -> Result<Vec<u8>, StateError> {
        bincode::serialize(self).map_err(|e| StateError::Encode(e.to_string()))
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, StateError> {
        bincode::deserialize(bytes).map_err(|e| StateError::Decode(e.to_string()))
    }
}

impl StackCombatState {
    /// Captures the mutable state of stack `stack_id`.
    pub fn to_info(&self, stack_id: StackId) -> StackStateInfo {
        StackStateInfo {
            stack_id,
            data: StackStateData {
                flags: self.flags,
                clone_id: self.clone_id,
                position: self.position,
                health: self.health.data(),
                shots_used: self.shots.used(),
                casts_used: self.casts.used(),
                retaliations_used: self.retaliations.used(),
                retaliations_cached_total: self.retaliations.policy().cached_total(),
            },
        }
    }

    /// Overwrites the mutable state with `info`, which must describe
    /// `expected`.
    ///
    /// A transfer form for another stack is logged and rejected, leaving
    /// `self` untouched.
    pub fn apply_info(&mut self, expected: StackId, info: &StackStateInfo) -> Result<(), StateError> {
        if info.stack_id != expected {
            tracing::warn!(
                expected = %expected,
                found = %info.stack_id,
                "rejecting state transfer for another stack"
            );
            return Err(StateError::StackMismatch {
                expected,
                found: info.stack_id,
            });
        }

        let data = &info.data;
        self.flags = data.flags;
        self.clone_id = data.clone_id;
        self.position = data.position;
        self.health.set_data(data.health);
        self.shots.set_used(data.shots_used);
        self.casts.set_used(data.casts_used);
        self.retaliations.set_used(data.retaliations_used);
        self.retaliations
            .policy()
            .set_cached_total(data.retaliations_cached_total);
        Ok(())
    }

    /// Builds a state from a template carrying the stack's constants.
    pub fn from_info(
        template: &StackCombatState,
        expected: StackId,
        info: &StackStateInfo,
    ) -> Result<Self, StateError> {
        let mut state = template.clone();
        state.apply_info(expected, info)?;
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{HealLevel, HealPower};

    fn wounded() -> StackCombatState {
        let mut state = StackCombatState::new(10, 5).at(BattleHex::from_xy(4, 3));
        state.damage(23);
        state.heal(10, HealLevel::Resurrect, HealPower::OneBattle);
        state.flags.insert(StackFlags::WAITING);
        state.clone_id = Some(StackId(9));
        state
    }

    #[test]
    fn info_restores_mutable_state() {
        let source = wounded();
        let info = source.to_info(StackId(3));

        let mut target = StackCombatState::new(10, 5);
        target.apply_info(StackId(3), &info).unwrap();
        assert_eq!(target, source);
        assert_eq!(target.health.resurrected(), 1);
    }

    #[test]
    fn mismatched_stack_is_rejected() {
        let info = wounded().to_info(StackId(3));
        let mut target = StackCombatState::new(10, 5);
        let before = target.clone();

        let err = target.apply_info(StackId(4), &info).unwrap_err();
        assert_eq!(
            err,
            StateError::StackMismatch {
                expected: StackId(4),
                found: StackId(3)
            }
        );
        assert_eq!(target, before);
    }

    #[test]
    fn from_info_keeps_template_constants() {
        let info = wounded().to_info(StackId(1));
        let template = StackCombatState::new(10, 5);
        let state = StackCombatState::from_info(&template, StackId(1), &info).unwrap();
        assert_eq!(state.total_health(), 50);
        assert_eq!(state.available_health(), 37);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn binary_form_decodes_to_same_info() {
        let info = wounded().to_info(StackId(7));
        let bytes = info.encode().unwrap();
        assert_eq!(StackStateInfo::decode(&bytes).unwrap(), info);
        assert!(StackStateInfo::decode(&bytes[..3]).is_err());
    }
}
