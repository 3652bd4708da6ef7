//! Movement reachability as provided by the pathfinder.

use crate::battle::BattleInfo;
use crate::hex::BattleHex;
use crate::unit::{StackId, Unit};

/// Movement cost of an unreachable hex.
pub const INFINITE_DISTANCE: u32 = 1_000_000;

/// Per-hex movement distance for one stack.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Distances {
    table: Vec<u32>,
}

impl Distances {
    /// Table with every hex unreachable.
    pub fn unreachable() -> Self {
        Self {
            table: vec![INFINITE_DISTANCE; BattleHex::FIELD_SIZE],
        }
    }

    /// Distance to `hex`; [`INFINITE_DISTANCE`] for unreachable or invalid
    /// hexes.
    pub fn get(&self, hex: BattleHex) -> u32 {
        hex.index()
            .and_then(|i| self.table.get(i).copied())
            .unwrap_or(INFINITE_DISTANCE)
    }

    /// Records the distance to `hex`; invalid hexes are ignored.
    pub fn set(&mut self, hex: BattleHex, distance: u32) {
        if let Some(slot) = hex.index().and_then(|i| self.table.get_mut(i)) {
            *slot = distance;
        }
    }

    pub fn is_reachable(&self, hex: BattleHex) -> bool {
        self.get(hex) < INFINITE_DISTANCE
    }
}

impl Default for Distances {
    fn default() -> Self {
        Self::unreachable()
    }
}

/// Pathfinding collaborator.
///
/// The battle view is passed in so answers reflect hypothetical positions
/// when queried through an overlay.
pub trait ReachabilityOracle {
    /// Movement distance from `from` to every hex.
    fn distances(&self, battle: &dyn BattleInfo, unit: &dyn Unit, from: BattleHex) -> Distances;

    /// Hexes `unit` can occupy this turn starting from `from`.
    fn available_hexes(
        &self,
        battle: &dyn BattleInfo,
        unit: &dyn Unit,
        from: BattleHex,
    ) -> Vec<BattleHex>;

    /// Nearest attackable stack and the hex to attack it from.
    fn nearest_stack(&self, battle: &dyn BattleInfo, unit: &dyn Unit)
    -> Option<(StackId, BattleHex)>;
}
