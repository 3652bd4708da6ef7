//! Battlefield hex geometry.
//!
//! The battlefield is a 17×11 grid of offset-row hexes addressed by a single
//! index (`y * 17 + x`). Odd rows are shifted half a hex to the left, so the
//! diagonal neighbours of a hex depend on the parity of its row.
//!
//! Columns 0 and 16 exist for geometry but are never available to stand on.

use arrayvec::ArrayVec;
use strum::IntoEnumIterator;

use crate::unit::BattleSide;

/// Direction from one hex to an adjacent hex.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::EnumIter, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HexDirection {
    TopLeft,
    TopRight,
    Right,
    BottomRight,
    BottomLeft,
    Left,
}

/// A single battlefield hex, or [`BattleHex::INVALID`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleHex(pub i16);

impl BattleHex {
    pub const FIELD_WIDTH: i16 = 17;
    pub const FIELD_HEIGHT: i16 = 11;
    pub const FIELD_SIZE: usize = (Self::FIELD_WIDTH * Self::FIELD_HEIGHT) as usize;

    /// Marker for "no hex" (ranged attacks, off-field stacks).
    pub const INVALID: Self = Self(-1);

    /// Builds a hex from column/row, or [`BattleHex::INVALID`] when off-field.
    pub const fn from_xy(x: i16, y: i16) -> Self {
        if x < 0 || y < 0 || x >= Self::FIELD_WIDTH || y >= Self::FIELD_HEIGHT {
            Self::INVALID
        } else {
            Self(y * Self::FIELD_WIDTH + x)
        }
    }

    pub const fn x(self) -> i16 {
        self.0 % Self::FIELD_WIDTH
    }

    pub const fn y(self) -> i16 {
        self.0 / Self::FIELD_WIDTH
    }

    /// Returns true if the hex lies on the field.
    pub const fn is_valid(self) -> bool {
        self.0 >= 0 && (self.0 as usize) < Self::FIELD_SIZE
    }

    /// Returns true if a unit may stand on this hex (edge columns excluded).
    pub const fn is_available(self) -> bool {
        self.is_valid() && self.x() > 0 && self.x() < Self::FIELD_WIDTH - 1
    }

    /// Index into per-hex tables such as reachability distances.
    pub fn index(self) -> Option<usize> {
        self.is_valid().then_some(self.0 as usize)
    }

    /// The adjacent hex in `dir`, or [`BattleHex::INVALID`] when it leaves the field.
    pub fn step(self, dir: HexDirection) -> Self {
        if !self.is_valid() {
            return Self::INVALID;
        }
        let (x, y) = (self.x(), self.y());
        let odd = y % 2 != 0;
        match dir {
            HexDirection::TopLeft => Self::from_xy(if odd { x - 1 } else { x }, y - 1),
            HexDirection::TopRight => Self::from_xy(if odd { x } else { x + 1 }, y - 1),
            HexDirection::Right => Self::from_xy(x + 1, y),
            HexDirection::BottomRight => Self::from_xy(if odd { x } else { x + 1 }, y + 1),
            HexDirection::BottomLeft => Self::from_xy(if odd { x - 1 } else { x }, y + 1),
            HexDirection::Left => Self::from_xy(x - 1, y),
        }
    }

    /// Shifts the index horizontally by `delta` columns within the same row.
    pub fn shifted(self, delta: i16) -> Self {
        if !self.is_valid() {
            return Self::INVALID;
        }
        Self::from_xy(self.x() + delta, self.y())
    }

    /// All on-field neighbours, in direction order.
    pub fn neighbouring_tiles(self) -> ArrayVec<BattleHex, 6> {
        HexDirection::iter()
            .map(|dir| self.step(dir))
            .filter(|hex| hex.is_valid())
            .collect()
    }

    /// Direction in which `other` lies when it is adjacent to `self`.
    pub fn mutual_position(self, other: BattleHex) -> Option<HexDirection> {
        if !self.is_valid() || !other.is_valid() {
            return None;
        }
        HexDirection::iter().find(|dir| self.step(*dir) == other)
    }

    /// Returns true if the two hexes share an edge.
    pub fn is_adjacent(self, other: BattleHex) -> bool {
        self.mutual_position(other).is_some()
    }

    /// Number of steps between two hexes.
    pub fn distance(self, other: BattleHex) -> u32 {
        let (y1, y2) = (i32::from(self.y()), i32::from(other.y()));
        let x1 = i32::from(self.x()) + y1 / 2;
        let x2 = i32::from(other.x()) + y2 / 2;
        let (dx, dy) = (x2 - x1, y2 - y1);

        if (dx >= 0 && dy >= 0) || (dx < 0 && dy < 0) {
            dx.abs().max(dy.abs()) as u32
        } else {
            (dx.abs() + dy.abs()) as u32
        }
    }

    /// Second hex covered by a double-wide unit standing on `self`.
    ///
    /// Attackers face right, so their tail extends one column to the left;
    /// defenders mirror that.
    pub fn occupied_hex(self, side: BattleSide, double_wide: bool) -> Option<BattleHex> {
        if !double_wide {
            return None;
        }
        let tail = match side {
            BattleSide::Attacker => self.shifted(-1),
            BattleSide::Defender => self.shifted(1),
        };
        tail.is_valid().then_some(tail)
    }

    /// Hexes covered by a unit standing on `self`, front first.
    pub fn footprint(self, side: BattleSide, double_wide: bool) -> ArrayVec<BattleHex, 2> {
        let mut hexes = ArrayVec::new();
        if self.is_valid() {
            hexes.push(self);
        }
        if let Some(tail) = self.occupied_hex(side, double_wide) {
            hexes.push(tail);
        }
        hexes
    }
}

impl Default for BattleHex {
    fn default() -> Self {
        Self::INVALID
    }
}

impl std::fmt::Display for BattleHex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_valid() {
            write!(f, "hex {} ({}, {})", self.0, self.x(), self.y())
        } else {
            f.write_str("hex <invalid>")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbours_depend_on_row_parity() {
        // even row
        let even = BattleHex::from_xy(5, 4);
        assert_eq!(even.step(HexDirection::TopLeft), BattleHex::from_xy(5, 3));
        assert_eq!(even.step(HexDirection::TopRight), BattleHex::from_xy(6, 3));
        // odd row
        let odd = BattleHex::from_xy(5, 3);
        assert_eq!(odd.step(HexDirection::BottomLeft), BattleHex::from_xy(4, 4));
        assert_eq!(odd.step(HexDirection::BottomRight), BattleHex::from_xy(5, 4));
    }

    #[test]
    fn every_neighbour_is_at_distance_one() {
        for index in 0..BattleHex::FIELD_SIZE as i16 {
            let hex = BattleHex(index);
            for neighbour in hex.neighbouring_tiles() {
                assert_eq!(hex.distance(neighbour), 1, "{hex} -> {neighbour}");
                assert!(neighbour.is_adjacent(hex));
            }
        }
    }

    #[test]
    fn corner_hex_has_fewer_neighbours() {
        assert_eq!(BattleHex::from_xy(0, 0).neighbouring_tiles().len(), 3);
        assert_eq!(BattleHex::from_xy(8, 5).neighbouring_tiles().len(), 6);
    }

    #[test]
    fn off_field_coordinates_are_invalid() {
        assert_eq!(BattleHex::from_xy(17, 0), BattleHex::INVALID);
        assert_eq!(BattleHex::from_xy(0, 11), BattleHex::INVALID);
        assert_eq!(BattleHex::from_xy(0, 0).step(HexDirection::Left), BattleHex::INVALID);
        assert!(!BattleHex::from_xy(0, 5).is_available());
        assert!(BattleHex::from_xy(1, 5).is_available());
    }

    #[test]
    fn distance_along_a_row() {
        assert_eq!(BattleHex::from_xy(1, 2).distance(BattleHex::from_xy(6, 2)), 5);
        assert_eq!(BattleHex::from_xy(3, 0).distance(BattleHex::from_xy(3, 4)), 4);
    }

    #[test]
    fn double_wide_tail_faces_away_from_enemy() {
        let hex = BattleHex::from_xy(5, 5);
        assert_eq!(
            hex.occupied_hex(BattleSide::Attacker, true),
            Some(BattleHex::from_xy(4, 5))
        );
        assert_eq!(
            hex.occupied_hex(BattleSide::Defender, true),
            Some(BattleHex::from_xy(6, 5))
        );
        assert_eq!(hex.occupied_hex(BattleSide::Attacker, false), None);
        assert_eq!(hex.footprint(BattleSide::Defender, true).len(), 2);
    }
}
